use super::{ShipStore, Visit};
use crate::{error::ShipResult, ingestion::NewVisit, types::VisitId};
use rusqlite::{params, OptionalExtension, Row};

impl ShipStore {
    pub fn insert_visit(&self, v: &NewVisit) -> ShipResult<VisitId> {
        self.conn.execute(
            "INSERT INTO visits (
                uc_student_uid, provider_id, cpt_code,
                visit_date, visit_type, is_in_network
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                v.uc_student_uid,
                v.provider_id,
                v.cpt_code,
                v.visit_date,
                v.visit_type,
                v.is_in_network,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_visit(&self, visit_id: VisitId) -> ShipResult<Option<Visit>> {
        let visit = self
            .conn
            .query_row(
                "SELECT visit_id, uc_student_uid, provider_id, cpt_code,
                        visit_date, visit_type, is_in_network
                 FROM visits WHERE visit_id = ?1",
                params![visit_id],
                Self::map_visit_row,
            )
            .optional()?;
        Ok(visit)
    }

    /// Visits for `uid`, optionally bounded (inclusive) on either side.
    /// Bounds compare as text, which matches calendar order for ISO dates.
    /// Ordered by visit date, then insertion order.
    pub fn visits_for_student(
        &self,
        uid: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ShipResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            "SELECT visit_id, uc_student_uid, provider_id, cpt_code,
                    visit_date, visit_type, is_in_network
             FROM visits
             WHERE uc_student_uid = ?1
               AND (?2 IS NULL OR visit_date >= ?2)
               AND (?3 IS NULL OR visit_date <= ?3)
             ORDER BY visit_date ASC, visit_id ASC",
        )?;
        let rows = stmt
            .query_map(params![uid, start_date, end_date], Self::map_visit_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_visit_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
        Ok(Visit {
            visit_id: row.get(0)?,
            uc_student_uid: row.get(1)?,
            provider_id: row.get(2)?,
            cpt_code: row.get(3)?,
            visit_date: row.get(4)?,
            visit_type: row.get(5)?,
            is_in_network: row.get(6)?,
        })
    }
}
