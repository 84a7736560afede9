//! What the formatter needs to know about the current request.

/// Name of the cookie carrying the client timezone offset in minutes.
pub const TIMEZONE_COOKIE: &str = "tz";

/// Per-request facts supplied by the hosting application.
pub trait HostContext {
    /// Whether the page is served over a secure transport. Forum links are
    /// upgraded to `https` when set.
    fn is_secure(&self) -> bool;

    /// Minutes to add to UTC to get the client wall clock.
    fn timezone_offset_minutes(&self) -> f64;
}

/// Plain [`HostContext`] built from request data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequestContext {
    pub secure: bool,
    pub timezone_offset_minutes: f64,
}

impl RequestContext {
    pub fn new(secure: bool, timezone_offset_minutes: f64) -> Self {
        RequestContext {
            secure,
            timezone_offset_minutes,
        }
    }

    /// Build from a raw `Cookie` header. A missing or unparsable `tz` value
    /// means offset zero.
    pub fn from_cookie_header(secure: bool, header: &str) -> Self {
        let offset = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| name.trim() == TIMEZONE_COOKIE)
            .and_then(|(_, value)| parse_offset(value))
            .unwrap_or(0.0);
        RequestContext::new(secure, offset)
    }
}

impl HostContext for RequestContext {
    fn is_secure(&self) -> bool {
        self.secure
    }

    fn timezone_offset_minutes(&self) -> f64 {
        self.timezone_offset_minutes
    }
}

/// Parse a timezone cookie value.
pub fn parse_offset(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|offset| offset.is_finite())
}
