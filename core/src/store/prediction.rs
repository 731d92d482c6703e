use super::{AccuracyRow, PredictionHistoryEntry, PredictionResultRow, PredictionRow, ShipStore};
use crate::{error::ShipResult, ingestion::NewPrediction, types::PredictionId};
use rusqlite::{params, OptionalExtension};

impl ShipStore {
    pub fn insert_prediction(&self, p: &NewPrediction) -> ShipResult<PredictionId> {
        self.conn.execute(
            "INSERT INTO predictions (
                uc_student_uid, visit_id, cpt_code,
                predicted_range_min, predicted_range_max, predicted_total
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                p.uc_student_uid,
                p.visit_id,
                p.cpt_code,
                p.predicted_low,
                p.predicted_high,
                p.predicted_total,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_prediction(&self, prediction_id: PredictionId) -> ShipResult<Option<PredictionRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT prediction_id, uc_student_uid, visit_id, cpt_code,
                        predicted_range_min, predicted_range_max, predicted_total
                 FROM predictions WHERE prediction_id = ?1",
                params![prediction_id],
                |row| {
                    Ok(PredictionRow {
                        prediction_id: row.get(0)?,
                        uc_student_uid: row.get(1)?,
                        visit_id: row.get(2)?,
                        cpt_code: row.get(3)?,
                        predicted_range_min: row.get(4)?,
                        predicted_range_max: row.get(5)?,
                        predicted_total: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    // ── Prediction results ─────────────────────────────────────────────

    pub fn insert_prediction_result(&self, r: &PredictionResultRow) -> ShipResult<()> {
        self.conn.execute(
            "INSERT INTO prediction_results (
                prediction_id, actual_student_paid, error_amount, error_pct
             ) VALUES (?1, ?2, ?3, ?4)",
            params![
                r.prediction_id,
                r.actual_student_paid,
                r.error_amount,
                r.error_pct,
            ],
        )?;
        Ok(())
    }

    pub fn get_prediction_result(
        &self,
        prediction_id: PredictionId,
    ) -> ShipResult<Option<PredictionResultRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT prediction_id, actual_student_paid, error_amount, error_pct
                 FROM prediction_results WHERE prediction_id = ?1",
                params![prediction_id],
                |row| {
                    Ok(PredictionResultRow {
                        prediction_id: row.get(0)?,
                        actual_student_paid: row.get(1)?,
                        error_amount: row.get(2)?,
                        error_pct: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Visit-linked predictions for `uid`, newest visit first, with their
    /// reconciliation outcome when one exists. Standalone (procedure-code
    /// only) predictions have no visit date and are not listed.
    pub fn prediction_history(&self, uid: &str) -> ShipResult<Vec<PredictionHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.prediction_id, v.visit_date,
                    p.predicted_range_min, p.predicted_range_max,
                    r.actual_student_paid, r.error_amount, r.error_pct
             FROM predictions p
             JOIN visits v ON p.visit_id = v.visit_id
             LEFT JOIN prediction_results r ON p.prediction_id = r.prediction_id
             WHERE p.uc_student_uid = ?1
             ORDER BY v.visit_date DESC, p.prediction_id DESC",
        )?;
        let rows = stmt
            .query_map(params![uid], |row| {
                Ok(PredictionHistoryEntry {
                    prediction_id: row.get(0)?,
                    visit_date: row.get(1)?,
                    predicted_range_min: row.get(2)?,
                    predicted_range_max: row.get(3)?,
                    actual_student_paid: row.get(4)?,
                    error_amount: row.get(5)?,
                    error_pct: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn prediction_accuracy(&self, uid: &str) -> ShipResult<AccuracyRow> {
        let row = self.conn.query_row(
            "SELECT COUNT(r.result_id), AVG(r.error_amount), AVG(r.error_pct),
                    MAX(r.error_amount)
             FROM prediction_results r
             JOIN predictions p ON p.prediction_id = r.prediction_id
             WHERE p.uc_student_uid = ?1",
            params![uid],
            |row| {
                Ok(AccuracyRow {
                    reconciled: row.get(0)?,
                    mean_absolute_error: row.get(1)?,
                    mean_error_pct: row.get(2)?,
                    max_error: row.get(3)?,
                })
            },
        )?;
        Ok(row)
    }
}
