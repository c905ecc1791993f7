use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Statements are executed one at a time, in order; every one is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS operating_hours (
        weekday SMALLINT PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6),
        is_active BOOLEAN NOT NULL,
        time_intervals JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS global_settings (
        id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
        booking_duration_minutes INTEGER NOT NULL CHECK (booking_duration_minutes > 0),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    INSERT INTO global_settings (id, booking_duration_minutes)
    VALUES (1, 60)
    ON CONFLICT (id) DO NOTHING;
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS weekday_slots (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
        time VARCHAR(16) NOT NULL,
        CONSTRAINT weekday_slots_unique UNIQUE (weekday, time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS date_overrides (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        date DATE NOT NULL,
        time VARCHAR(16) NOT NULL,
        service VARCHAR(255) NULL,
        available BOOLEAN NOT NULL,
        replaced_available BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    "ALTER TABLE date_overrides ADD COLUMN IF NOT EXISTS replaced_available BOOLEAN NOT NULL DEFAULT FALSE;",
    r#"
    CREATE TABLE IF NOT EXISTS blocked_dates (
        date DATE PRIMARY KEY,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blocked_intervals (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        date DATE NOT NULL,
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        reason TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_blocked_range CHECK (end_time > start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        service VARCHAR(255) NOT NULL,
        date DATE NOT NULL,
        time VARCHAR(16) NOT NULL,
        name VARCHAR(255) NOT NULL,
        telephone VARCHAR(64) NOT NULL,
        email VARCHAR(255) NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    // A service holds one booking per start time, whether the label is `HH:MM` or `HH:MM-HH:MM`.
    "ALTER TABLE bookings DROP CONSTRAINT IF EXISTS bookings_slot_unique;",
    "CREATE UNIQUE INDEX IF NOT EXISTS bookings_slot_start_unique ON bookings (date, service, (split_part(time, '-', 1)));",
    r#"
    CREATE TABLE IF NOT EXISTS announcements (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        message TEXT NOT NULL,
        kind VARCHAR(16) NOT NULL DEFAULT 'info',
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_announcements_single_active ON announcements (active) WHERE active;",
    "CREATE INDEX IF NOT EXISTS idx_date_overrides_date ON date_overrides(date);",
    "CREATE INDEX IF NOT EXISTS idx_blocked_intervals_date ON blocked_intervals(date);",
    "CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);",
    "CREATE INDEX IF NOT EXISTS idx_weekday_slots_weekday ON weekday_slots(weekday);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
