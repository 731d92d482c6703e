use super::{ShipStore, Student};
use crate::error::ShipResult;
use rusqlite::{params, OptionalExtension};

impl ShipStore {
    /// Enrollment-feed write path. The service itself never creates students.
    pub fn insert_student(&self, s: &Student) -> ShipResult<()> {
        self.conn.execute(
            "INSERT INTO students (uc_student_uid, full_name, campus_flag, email)
             VALUES (?1, ?2, ?3, ?4)",
            params![s.uc_student_uid, s.full_name, s.campus_flag, s.email],
        )?;
        Ok(())
    }

    pub fn get_student(&self, uid: &str) -> ShipResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT uc_student_uid, full_name, campus_flag, email
                 FROM students WHERE uc_student_uid = ?1",
                params![uid],
                |row| {
                    Ok(Student {
                        uc_student_uid: row.get(0)?,
                        full_name: row.get(1)?,
                        campus_flag: row.get(2)?,
                        email: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(student)
    }

    pub fn student_exists(&self, uid: &str) -> ShipResult<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE uc_student_uid = ?1",
            params![uid],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }
}
