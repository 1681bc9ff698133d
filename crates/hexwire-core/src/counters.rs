use std::fmt;

use serde::Serialize;

use crate::dissect::ProtocolClass;

/// Running per-protocol totals for one sniffing session.
///
/// An explicit aggregation object: the session loop owns one and threads it
/// through by reference. `total` counts every frame handed to the dissector,
/// including frames whose dissection aborted; those are kept visible in
/// `malformed` so the class counters always reconcile with `total`.
///
/// # Examples
/// ```
/// use hexwire_core::{ProtocolClass, ProtocolCounters};
///
/// let mut counters = ProtocolCounters::default();
/// counters.record(ProtocolClass::Udp);
/// counters.record_malformed();
/// assert_eq!(counters.total, 2);
/// assert_eq!(counters.udp, 1);
/// assert_eq!(counters.classified(), 1);
/// ```
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProtocolCounters {
    pub tcp: u64,
    pub udp: u64,
    pub icmp: u64,
    pub igmp: u64,
    pub other: u64,
    pub malformed: u64,
    pub total: u64,
}

impl ProtocolCounters {
    /// Record a frame that decoded far enough to be classified.
    pub fn record(&mut self, class: ProtocolClass) {
        self.total += 1;
        match class {
            ProtocolClass::Tcp => self.tcp += 1,
            ProtocolClass::Udp => self.udp += 1,
            ProtocolClass::Icmp => self.icmp += 1,
            ProtocolClass::Igmp => self.igmp += 1,
            ProtocolClass::Other => self.other += 1,
        }
    }

    /// Record a frame whose dissection aborted before classification.
    pub fn record_malformed(&mut self) {
        self.total += 1;
        self.malformed += 1;
    }

    /// Frames that reached the dispatcher and landed in a class bucket.
    pub fn classified(&self) -> u64 {
        self.tcp + self.udp + self.icmp + self.igmp + self.other
    }
}

impl fmt::Display for ProtocolCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TCP : {}   UDP : {}   ICMP : {}   IGMP : {}   Others : {}   Total : {}",
            self.tcp, self.udp, self.icmp, self.igmp, self.other, self.total
        )
    }
}
