pub(super) const INSERT_QUEUE_ROW: &str = r#"
    INSERT INTO queue (created_at, payload)
    VALUES (?1, ?2)
"#;

pub(super) const SELECT_OLDEST_QUEUE_ROWS: &str = r#"
    SELECT local_key, created_at, payload
    FROM queue
    ORDER BY local_key ASC
    LIMIT ?1
"#;

pub(super) const DELETE_QUEUE_ROW: &str = r#"
    DELETE FROM queue
    WHERE local_key = ?1
"#;

pub(super) const DELETE_ALL_QUEUE_ROWS: &str = "DELETE FROM queue";

pub(super) const COUNT_QUEUE_ROWS: &str = "SELECT COUNT(*) AS count FROM queue";
