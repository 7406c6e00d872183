use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cars
    (license_plate text, timestamp text, parking_slot integer);
CREATE TABLE IF NOT EXISTS parking_slots
    (slot_number integer PRIMARY KEY, occupied boolean);
CREATE TABLE IF NOT EXISTS exited_cars
    (license_plate text, time_in text, time_out text, duration text);
";

pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('cars', 'parking_slots', 'exited_cars')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
