//! Lightweight global metrics for the store.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Medium (commits)
//! - Static region (registrations, reads, writes)
//! - Dynamic blob (reads, writes)
//! - Reported failures

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Medium -----
static COMMITS_TOTAL: AtomicU64 = AtomicU64::new(0);
static COMMIT_BYTES: AtomicU64 = AtomicU64::new(0);

// ----- Static region -----
static REGISTRATIONS: AtomicU64 = AtomicU64::new(0);
static REGISTRATIONS_REJECTED: AtomicU64 = AtomicU64::new(0);
static STATIC_READS: AtomicU64 = AtomicU64::new(0);
static STATIC_WRITES: AtomicU64 = AtomicU64::new(0);
static STATIC_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

// ----- Dynamic blob -----
static BLOB_READS: AtomicU64 = AtomicU64::new(0);
static BLOB_WRITES: AtomicU64 = AtomicU64::new(0);
static BLOB_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

// ----- Failures -----
static FAILURES_REPORTED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Medium
    pub commits_total: u64,
    pub commit_bytes: u64,

    // Static region
    pub registrations: u64,
    pub registrations_rejected: u64,
    pub static_reads: u64,
    pub static_writes: u64,
    pub static_bytes_written: u64,

    // Dynamic blob
    pub blob_reads: u64,
    pub blob_writes: u64,
    pub blob_bytes_written: u64,

    // Failures
    pub failures_reported: u64,
}

impl MetricsSnapshot {
    pub fn avg_blob_record_len(&self) -> f64 {
        if self.blob_writes == 0 {
            0.0
        } else {
            self.blob_bytes_written as f64 / self.blob_writes as f64
        }
    }
}

// ----- Recorders (Medium) -----
pub fn record_commit(bytes: usize) {
    COMMITS_TOTAL.fetch_add(1, Ordering::Relaxed);
    COMMIT_BYTES.fetch_add(bytes as u64, Ordering::Relaxed);
}

// ----- Recorders (Static region) -----
pub fn record_registration() {
    REGISTRATIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_registration_rejected() {
    REGISTRATIONS_REJECTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_static_read() {
    STATIC_READS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_static_write(bytes: usize) {
    STATIC_WRITES.fetch_add(1, Ordering::Relaxed);
    STATIC_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

// ----- Recorders (Dynamic blob) -----
pub fn record_blob_read() {
    BLOB_READS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_blob_write(bytes: usize) {
    BLOB_WRITES.fetch_add(1, Ordering::Relaxed);
    BLOB_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

// ----- Recorders (Failures) -----
pub fn record_failure() {
    FAILURES_REPORTED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        commits_total: COMMITS_TOTAL.load(Ordering::Relaxed),
        commit_bytes: COMMIT_BYTES.load(Ordering::Relaxed),

        registrations: REGISTRATIONS.load(Ordering::Relaxed),
        registrations_rejected: REGISTRATIONS_REJECTED.load(Ordering::Relaxed),
        static_reads: STATIC_READS.load(Ordering::Relaxed),
        static_writes: STATIC_WRITES.load(Ordering::Relaxed),
        static_bytes_written: STATIC_BYTES_WRITTEN.load(Ordering::Relaxed),

        blob_reads: BLOB_READS.load(Ordering::Relaxed),
        blob_writes: BLOB_WRITES.load(Ordering::Relaxed),
        blob_bytes_written: BLOB_BYTES_WRITTEN.load(Ordering::Relaxed),

        failures_reported: FAILURES_REPORTED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    COMMITS_TOTAL.store(0, Ordering::Relaxed);
    COMMIT_BYTES.store(0, Ordering::Relaxed);

    REGISTRATIONS.store(0, Ordering::Relaxed);
    REGISTRATIONS_REJECTED.store(0, Ordering::Relaxed);
    STATIC_READS.store(0, Ordering::Relaxed);
    STATIC_WRITES.store(0, Ordering::Relaxed);
    STATIC_BYTES_WRITTEN.store(0, Ordering::Relaxed);

    BLOB_READS.store(0, Ordering::Relaxed);
    BLOB_WRITES.store(0, Ordering::Relaxed);
    BLOB_BYTES_WRITTEN.store(0, Ordering::Relaxed);

    FAILURES_REPORTED.store(0, Ordering::Relaxed);
}
