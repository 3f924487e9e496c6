pub const SCHEMA: &str = r#"
-- highlights table: one row per (table, key), item stored as JSON
CREATE TABLE IF NOT EXISTS highlights (
    table_name TEXT NOT NULL,
    item_key TEXT NOT NULL,
    item TEXT NOT NULL,
    fetch_date TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (table_name, item_key)
);

CREATE INDEX IF NOT EXISTS idx_highlights_fetch_date ON highlights(table_name, fetch_date);
"#;
