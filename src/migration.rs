//! Schema DDL applied at startup. Idempotent: CREATE TABLE IF NOT EXISTS plus
//! secondary indexes; unique natural keys are enforced by the store so a
//! concurrent create that slips past the pre-check still fails cleanly.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
  id BIGSERIAL PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  username TEXT NOT NULL UNIQUE,
  email TEXT UNIQUE,
  password_hash TEXT NOT NULL,
  role TEXT NOT NULL DEFAULT 'user',
  is_active BOOLEAN NOT NULL DEFAULT TRUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS brands (
  id BIGSERIAL PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  name TEXT NOT NULL UNIQUE,
  description TEXT,
  website TEXT,
  country TEXT,
  brand_type TEXT NOT NULL DEFAULT 'camera',
  is_active BOOLEAN NOT NULL DEFAULT TRUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS mounts (
  id BIGSERIAL PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  name TEXT NOT NULL UNIQUE,
  flange_distance DOUBLE PRECISION,
  release_year INT,
  description TEXT,
  is_active BOOLEAN NOT NULL DEFAULT TRUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS brand_mounts (
  brand_id BIGINT NOT NULL REFERENCES brands (id),
  mount_id BIGINT NOT NULL REFERENCES mounts (id),
  is_primary BOOLEAN NOT NULL DEFAULT FALSE,
  compatibility_notes TEXT NOT NULL DEFAULT '',
  PRIMARY KEY (brand_id, mount_id)
)"#,
    r#"CREATE TABLE IF NOT EXISTS cameras (
  id BIGSERIAL PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  brand_id BIGINT NOT NULL REFERENCES brands (id),
  mount_id BIGINT NOT NULL REFERENCES mounts (id),
  model TEXT NOT NULL UNIQUE,
  series TEXT,
  sensor_size TEXT,
  megapixels DOUBLE PRECISION,
  ibis_level TEXT,
  has_hot_shoe BOOLEAN NOT NULL DEFAULT TRUE,
  has_built_in_flash BOOLEAN NOT NULL DEFAULT FALSE,
  has_wifi BOOLEAN NOT NULL DEFAULT TRUE,
  has_bluetooth BOOLEAN NOT NULL DEFAULT TRUE,
  release_date DATE,
  release_price DOUBLE PRECISION,
  weight DOUBLE PRECISION,
  is_active BOOLEAN NOT NULL DEFAULT TRUE,
  description TEXT
)"#,
    r#"CREATE TABLE IF NOT EXISTS lenses (
  id BIGSERIAL PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  brand_id BIGINT NOT NULL REFERENCES brands (id),
  mount_id BIGINT NOT NULL REFERENCES mounts (id),
  model TEXT NOT NULL UNIQUE,
  series TEXT,
  min_focal_length DOUBLE PRECISION NOT NULL,
  max_focal_length DOUBLE PRECISION NOT NULL,
  lens_type TEXT NOT NULL,
  max_aperture_min DOUBLE PRECISION NOT NULL,
  max_aperture_max DOUBLE PRECISION,
  is_constant_aperture BOOLEAN NOT NULL DEFAULT FALSE,
  weight DOUBLE PRECISION,
  height DOUBLE PRECISION,
  diameter DOUBLE PRECISION,
  filter_size DOUBLE PRECISION,
  focus_type TEXT NOT NULL DEFAULT 'auto',
  has_stabilization BOOLEAN NOT NULL DEFAULT FALSE,
  min_focus_distance DOUBLE PRECISION,
  magnification DOUBLE PRECISION,
  release_date DATE,
  release_price DOUBLE PRECISION,
  is_active BOOLEAN NOT NULL DEFAULT TRUE,
  description TEXT
)"#,
    "CREATE INDEX IF NOT EXISTS idx_cameras_brand_id ON cameras (brand_id)",
    "CREATE INDEX IF NOT EXISTS idx_cameras_mount_id ON cameras (mount_id)",
    "CREATE INDEX IF NOT EXISTS idx_lenses_brand_id ON lenses (brand_id)",
    "CREATE INDEX IF NOT EXISTS idx_lenses_mount_id ON lenses (mount_id)",
    "CREATE INDEX IF NOT EXISTS idx_brand_mounts_mount_id ON brand_mounts (mount_id)",
];

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in DDL {
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!("schema migrations applied");
    Ok(())
}
