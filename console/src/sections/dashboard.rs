use chrono_tz::Tz;
use hrdesk_core::dashboard::DashboardStats;
use std::sync::Arc;

use crate::state::store::AppStore;
use crate::utils::time::today_local;

/// Summary figures computed from the cached collections.
pub async fn stats(store: &Arc<AppStore>, time_zone: &Tz) -> DashboardStats {
    let snapshot = store.snapshot().await;
    DashboardStats::compute(
        &snapshot.employees,
        &snapshot.departments,
        &snapshot.leaves,
        &snapshot.attendance,
        today_local(time_zone),
    )
}
