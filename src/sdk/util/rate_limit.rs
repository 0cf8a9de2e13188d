use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

// openrouteservice free plan: 100 geocode requests per minute, kept well below
const ORS_GEOCODE_PER_MINUTE: u32 = 40;

pub fn ors_limiter() -> Limiter {
    per_minute(ORS_GEOCODE_PER_MINUTE)
}

pub fn per_minute(requests: u32) -> Limiter {
    let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}
