use super::{PlanYearRow, PolicyParameters, ShipStore};
use crate::error::{ShipError, ShipResult};
use rusqlite::{params, OptionalExtension};

impl ShipStore {
    /// Insert a plan year, or move the term bounds of an existing label.
    pub fn upsert_plan_year(&self, p: &PlanYearRow) -> ShipResult<()> {
        self.conn.execute(
            "INSERT INTO plan_years (year_label, term_start, term_end)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(year_label) DO UPDATE SET
                term_start = excluded.term_start,
                term_end   = excluded.term_end",
            params![p.year_label, p.term_start, p.term_end],
        )?;
        Ok(())
    }

    pub fn get_plan_year(&self, year_label: &str) -> ShipResult<Option<PlanYearRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT year_label, term_start, term_end
                 FROM plan_years WHERE year_label = ?1",
                params![year_label],
                |row| {
                    Ok(PlanYearRow {
                        year_label: row.get(0)?,
                        term_start: row.get(1)?,
                        term_end: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Extractor write path: one row per (plan year, campus).
    pub fn insert_policy_parameters(&self, p: &PolicyParameters) -> ShipResult<i64> {
        let plan_year_id: i64 = self
            .conn
            .query_row(
                "SELECT plan_year_id FROM plan_years WHERE year_label = ?1",
                params![p.year_label],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| ShipError::not_found("Plan year", &p.year_label))?;

        self.conn.execute(
            "INSERT INTO policy_parameters (
                plan_year_id, campus_flag, effective_date, deductible,
                family_deductible, er_copay, imaging_copay, primary_care_copay,
                coinsurance_pct, oop_per_member, oop_per_family
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                plan_year_id,
                p.campus_flag,
                p.effective_date,
                p.deductible,
                p.family_deductible,
                p.er_copay,
                p.imaging_copay,
                p.primary_care_copay,
                p.coinsurance_pct,
                p.oop_per_member,
                p.oop_per_family,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn policy_for(
        &self,
        campus: &str,
        year_label: &str,
    ) -> ShipResult<Option<PolicyParameters>> {
        let row = self
            .conn
            .query_row(
                "SELECT p.policy_id, y.year_label, p.campus_flag, p.effective_date,
                        p.deductible, p.family_deductible, p.er_copay, p.imaging_copay,
                        p.primary_care_copay, p.coinsurance_pct,
                        p.oop_per_member, p.oop_per_family
                 FROM policy_parameters p
                 JOIN plan_years y ON p.plan_year_id = y.plan_year_id
                 WHERE y.year_label = ?1 AND p.campus_flag = ?2",
                params![year_label, campus],
                |row| {
                    Ok(PolicyParameters {
                        policy_id: row.get(0)?,
                        year_label: row.get(1)?,
                        campus_flag: row.get(2)?,
                        effective_date: row.get(3)?,
                        deductible: row.get(4)?,
                        family_deductible: row.get(5)?,
                        er_copay: row.get(6)?,
                        imaging_copay: row.get(7)?,
                        primary_care_copay: row.get(8)?,
                        coinsurance_pct: row.get(9)?,
                        oop_per_member: row.get(10)?,
                        oop_per_family: row.get(11)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
