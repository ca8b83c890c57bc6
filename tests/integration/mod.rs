/// PostgreSQL-backed tests; each one runs in its own throwaway database
pub mod pg_tracking_store;
