//! Transaction legs for the synthetic unique index.
//!
//! `claim` and `release` build conditional write operations; they never
//! execute standalone. Callers add them to a `TransactWriteItems` request
//! next to the entity write they guard, so the claim and the entity commit
//! or abort together.

use aws_sdk_dynamodb::types::{Delete, Put, TransactWriteItem};

use snapfeed_core::storage::{RepositoryError, UniqueClaim};

use super::keys;

/// Builds the transaction leg that claims `claim`, conditioned on the claim
/// row not existing yet. A concurrent holder makes the whole transaction
/// abort with a conditional check failure on this leg.
pub fn claim(table: &str, claim: &UniqueClaim) -> Result<TransactWriteItem, RepositoryError> {
    let put = Put::builder()
        .table_name(table)
        .set_item(Some(keys::unique_claim_key(claim)))
        .condition_expression(format!(
            "attribute_not_exists({}) AND attribute_not_exists({})",
            keys::ATTR_UNIQUE_VALUE,
            keys::ATTR_UNIQUE_DOMAIN
        ))
        .build()
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

    Ok(TransactWriteItem::builder().put(put).build())
}

/// Builds the transaction leg that releases `claim`.
pub fn release(table: &str, claim: &UniqueClaim) -> Result<TransactWriteItem, RepositoryError> {
    let delete = Delete::builder()
        .table_name(table)
        .set_key(Some(keys::unique_claim_key(claim)))
        .build()
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

    Ok(TransactWriteItem::builder().delete(delete).build())
}
