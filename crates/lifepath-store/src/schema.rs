//! Snapshot store database schema.

/// SQL to create the simulations table.
pub const CREATE_SIMULATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS simulations (
    simulation_id   UUID PRIMARY KEY,
    snapshot        JSONB NOT NULL,
    version         BIGINT NOT NULL,
    status          VARCHAR(32) NOT NULL,
    catalog_version VARCHAR(64) NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_simulations_status
    ON simulations (status);
";

/// SQL to create the archived results table.
pub const CREATE_RESULTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS simulation_results (
    simulation_id UUID PRIMARY KEY REFERENCES simulations (simulation_id),
    result        JSONB NOT NULL,
    archived_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
