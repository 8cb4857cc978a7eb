/// Lets a handler run at most once per `limit_ms`. Calls inside the window
/// are dropped, not deferred.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: f64,
    reopens_at: Option<f64>,
}

impl Throttle {
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms: f64::from(limit_ms),
            reopens_at: None,
        }
    }

    /// Returns true when a call at `now_ms` should run.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        match self.reopens_at {
            Some(reopens_at) if now_ms < reopens_at => false,
            _ => {
                self.reopens_at = Some(now_ms + self.limit_ms);
                true
            }
        }
    }
}

/// Ticket-based debounce: every call takes a ticket and schedules a timer
/// for `wait_ms`; when a timer fires only the newest ticket is honoured.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait_ms: u32,
    latest: u64,
}

impl Debounce {
    pub fn new(wait_ms: u32) -> Self {
        Self { wait_ms, latest: 0 }
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    pub fn schedule(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Consumes the ticket if it is still the newest one.
    pub fn settle(&mut self, ticket: u64) -> bool {
        if ticket != 0 && ticket == self.latest {
            self.latest += 1;
            true
        } else {
            false
        }
    }
}
