//! Tuition fee/payment repository contract and SQLite implementation.
//!
//! # Invariants
//! - Fee lists are per owner, newest registration first.
//! - Payments are unique per `(fee, year, month)`; recording twice keeps the
//!   first `paid_at`.
//! - Deleting a fee deletes its payments (`ON DELETE CASCADE`).
//! - Every fee or payment mutation is scoped to the fee's owner; a fee of
//!   another owner reads as `NotFound`.

use crate::model::owner::OwnerTag;
use crate::model::tuition::{TuitionFee, TuitionFeeId, TuitionPayment};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_owner, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const FEE_SELECT_SQL: &str = "SELECT
    uuid,
    owner,
    academy_name,
    amount,
    due_day,
    is_monthly,
    created_at
FROM tuition_fees";

/// Repository interface for tuition fees and their payments.
pub trait TuitionRepository {
    fn create_fee(&self, fee: &TuitionFee) -> RepoResult<TuitionFeeId>;
    /// Matches on id and `fee.owner`.
    fn update_fee(&self, fee: &TuitionFee) -> RepoResult<()>;
    fn get_fee(&self, id: TuitionFeeId) -> RepoResult<Option<TuitionFee>>;
    fn list_fees(&self, owner: &OwnerTag) -> RepoResult<Vec<TuitionFee>>;
    fn delete_fee(&self, owner: &OwnerTag, id: TuitionFeeId) -> RepoResult<()>;
    fn record_payment(&self, owner: &OwnerTag, payment: &TuitionPayment) -> RepoResult<()>;
    /// Returns whether a payment row was removed.
    fn remove_payment(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
        year: i32,
        month: u32,
    ) -> RepoResult<bool>;
    /// Oldest month first.
    fn list_payments(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
    ) -> RepoResult<Vec<TuitionPayment>>;
    fn list_payments_in_month(
        &self,
        owner: &OwnerTag,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<TuitionPayment>>;
}

/// SQLite-backed tuition repository.
pub struct SqliteTuitionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTuitionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn ensure_owned_fee(&self, owner: &OwnerTag, id: TuitionFeeId) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tuition_fees WHERE uuid = ?1 AND owner = ?2);",
            params![id.to_string(), owner.as_str()],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn query_payments(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<TuitionPayment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut payments = Vec::new();
        while let Some(row) = rows.next()? {
            payments.push(parse_payment_row(row)?);
        }
        Ok(payments)
    }
}

impl TuitionRepository for SqliteTuitionRepository<'_> {
    fn create_fee(&self, fee: &TuitionFee) -> RepoResult<TuitionFeeId> {
        fee.validate()?;

        self.conn.execute(
            "INSERT INTO tuition_fees (
                uuid,
                owner,
                academy_name,
                amount,
                due_day,
                is_monthly,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                fee.id.to_string(),
                fee.owner.as_str(),
                fee.academy_name.as_str(),
                amount_to_db(fee.amount)?,
                i64::from(fee.due_day),
                bool_to_int(fee.is_monthly),
                fee.created_at,
            ],
        )?;

        Ok(fee.id)
    }

    fn update_fee(&self, fee: &TuitionFee) -> RepoResult<()> {
        fee.validate()?;

        let changed = self.conn.execute(
            "UPDATE tuition_fees
             SET
                academy_name = ?2,
                amount = ?3,
                due_day = ?4,
                is_monthly = ?5
             WHERE uuid = ?1 AND owner = ?6;",
            params![
                fee.id.to_string(),
                fee.academy_name.as_str(),
                amount_to_db(fee.amount)?,
                i64::from(fee.due_day),
                bool_to_int(fee.is_monthly),
                fee.owner.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(fee.id));
        }
        Ok(())
    }

    fn get_fee(&self, id: TuitionFeeId) -> RepoResult<Option<TuitionFee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FEE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_fee_row(row)?));
        }
        Ok(None)
    }

    fn list_fees(&self, owner: &OwnerTag) -> RepoResult<Vec<TuitionFee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FEE_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY created_at DESC, seq DESC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut fees = Vec::new();
        while let Some(row) = rows.next()? {
            fees.push(parse_fee_row(row)?);
        }
        Ok(fees)
    }

    fn delete_fee(&self, owner: &OwnerTag, id: TuitionFeeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tuition_fees WHERE uuid = ?1 AND owner = ?2;",
            params![id.to_string(), owner.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn record_payment(&self, owner: &OwnerTag, payment: &TuitionPayment) -> RepoResult<()> {
        self.ensure_owned_fee(owner, payment.fee_id)?;

        self.conn.execute(
            "INSERT INTO tuition_payments (fee_uuid, year, month, paid_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (fee_uuid, year, month) DO NOTHING;",
            params![
                payment.fee_id.to_string(),
                payment.year,
                payment.month,
                payment.paid_at,
            ],
        )?;
        Ok(())
    }

    fn remove_payment(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
        year: i32,
        month: u32,
    ) -> RepoResult<bool> {
        self.ensure_owned_fee(owner, fee_id)?;
        let changed = self.conn.execute(
            "DELETE FROM tuition_payments
             WHERE fee_uuid = ?1 AND year = ?2 AND month = ?3;",
            params![fee_id.to_string(), year, month],
        )?;
        Ok(changed > 0)
    }

    fn list_payments(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
    ) -> RepoResult<Vec<TuitionPayment>> {
        self.ensure_owned_fee(owner, fee_id)?;
        self.query_payments(
            "SELECT fee_uuid, year, month, paid_at
             FROM tuition_payments
             WHERE fee_uuid = ?1
             ORDER BY year ASC, month ASC;",
            [fee_id.to_string()],
        )
    }

    fn list_payments_in_month(
        &self,
        owner: &OwnerTag,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<TuitionPayment>> {
        self.query_payments(
            "SELECT p.fee_uuid, p.year, p.month, p.paid_at
             FROM tuition_payments p
             JOIN tuition_fees f ON f.uuid = p.fee_uuid
             WHERE f.owner = ?1 AND p.year = ?2 AND p.month = ?3
             ORDER BY p.paid_at ASC;",
            params![owner.as_str(), year, month],
        )
    }
}

fn parse_fee_row(row: &Row<'_>) -> RepoResult<TuitionFee> {
    let uuid_text: String = row.get("uuid")?;
    let amount: i64 = row.get("amount")?;
    let due_day: i64 = row.get("due_day")?;

    let fee = TuitionFee {
        id: parse_uuid(&uuid_text, "tuition_fees.uuid")?,
        owner: parse_owner(row.get("owner")?, "tuition_fees.owner")?,
        academy_name: row.get("academy_name")?,
        amount: u64::try_from(amount).map_err(|_| {
            RepoError::InvalidData(format!("invalid amount `{amount}` in tuition_fees.amount"))
        })?,
        due_day: u8::try_from(due_day).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid due day `{due_day}` in tuition_fees.due_day"
            ))
        })?,
        is_monthly: parse_bool(row.get("is_monthly")?, "tuition_fees.is_monthly")?,
        created_at: row.get("created_at")?,
    };
    fee.validate()?;
    Ok(fee)
}

fn parse_payment_row(row: &Row<'_>) -> RepoResult<TuitionPayment> {
    let uuid_text: String = row.get(0)?;
    Ok(TuitionPayment {
        fee_id: parse_uuid(&uuid_text, "tuition_payments.fee_uuid")?,
        year: row.get(1)?,
        month: row.get(2)?,
        paid_at: row.get(3)?,
    })
}

fn amount_to_db(amount: u64) -> RepoResult<i64> {
    i64::try_from(amount)
        .map_err(|_| RepoError::InvalidData(format!("amount {amount} exceeds storage range")))
}
