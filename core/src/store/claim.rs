use super::{ClaimRow, ClaimTotals, NewClaim, ShipStore};
use crate::{error::ShipResult, types::VisitId};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

impl ShipStore {
    /// Claims-feed write path. Nothing inside the service calls this.
    pub fn insert_claim(&self, c: &NewClaim) -> ShipResult<i64> {
        self.conn.execute(
            "INSERT INTO claims (visit_id, uc_student_uid, student_paid, processed_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![c.visit_id, c.uc_student_uid, c.student_paid, c.processed_date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recently processed claim for a visit.
    pub fn latest_claim_for_visit(&self, visit_id: VisitId) -> ShipResult<Option<ClaimRow>> {
        let claim = self
            .conn
            .query_row(
                "SELECT claim_id, visit_id, uc_student_uid, student_paid, processed_date
                 FROM claims
                 WHERE visit_id = ?1
                 ORDER BY processed_date DESC, claim_id DESC
                 LIMIT 1",
                params![visit_id],
                |row| {
                    Ok(ClaimRow {
                        claim_id: row.get(0)?,
                        visit_id: row.get(1)?,
                        uc_student_uid: row.get(2)?,
                        student_paid: row.get(3)?,
                        processed_date: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(claim)
    }

    /// Count and sum of `student_paid` over claims processed in
    /// [`start`, `end`], both inclusive.
    pub fn student_paid_between(
        &self,
        uid: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ShipResult<ClaimTotals> {
        let totals = self.conn.query_row(
            "SELECT COUNT(*), SUM(student_paid)
             FROM claims
             WHERE uc_student_uid = ?1
               AND processed_date BETWEEN ?2 AND ?3",
            params![uid, start, end],
            |row| {
                Ok(ClaimTotals {
                    claim_count: row.get(0)?,
                    total: row.get(1)?,
                })
            },
        )?;
        Ok(totals)
    }
}
