//! IP address classification for outbound-probe safety.
//!
//! Everything that is not plain public unicast is unsafe to probe from a
//! public-probing context: private ranges can reach internal services,
//! link-local covers cloud metadata endpoints (169.254.169.254), and the
//! remaining special-purpose blocks have no legitimate probe target behind
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Classification of a single resolved IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpClass {
    /// Globally routable unicast — the only class safe to probe.
    Public,
    /// RFC1918 (IPv4) or unique-local fc00::/7 (IPv6).
    Private,
    /// 127.0.0.0/8 or ::1.
    Loopback,
    /// 169.254.0.0/16 or fe80::/10. Includes cloud metadata services.
    LinkLocal,
    /// 224.0.0.0/4 or ff00::/8.
    Multicast,
    /// IETF special-purpose blocks: documentation, benchmarking, CGNAT,
    /// broadcast, 240/4 and friends.
    Reserved,
    /// 0.0.0.0 or ::.
    Unspecified,
}

impl IpClass {
    /// Whether an address of this class may be contacted by a probe.
    pub fn is_public(&self) -> bool {
        matches!(self, IpClass::Public)
    }
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IpClass::Public => "public",
            IpClass::Private => "private",
            IpClass::Loopback => "loopback",
            IpClass::LinkLocal => "link-local",
            IpClass::Multicast => "multicast",
            IpClass::Reserved => "reserved",
            IpClass::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}

/// Classify an IP address. Pure function, no I/O.
pub fn classify(ip: IpAddr) -> IpClass {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => classify_v6(v6),
    }
}

fn classify_v4(ip: Ipv4Addr) -> IpClass {
    if ip.is_unspecified() {
        return IpClass::Unspecified;
    }
    if ip.is_loopback() {
        return IpClass::Loopback;
    }
    if ip.is_private() {
        return IpClass::Private;
    }
    if ip.is_link_local() {
        return IpClass::LinkLocal;
    }
    if ip.is_multicast() {
        return IpClass::Multicast;
    }
    if is_v4_reserved(ip) {
        return IpClass::Reserved;
    }
    IpClass::Public
}

/// Special-purpose IPv4 blocks outside the categories above.
fn is_v4_reserved(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    ip.is_broadcast()
        || ip.is_documentation()
        // 100.64.0.0/10 — carrier-grade NAT shared space
        || (o[0] == 100 && (o[1] & 0xc0) == 64)
        // 192.0.0.0/24 — IETF protocol assignments
        || (o[0] == 192 && o[1] == 0 && o[2] == 0)
        // 198.18.0.0/15 — benchmarking
        || (o[0] == 198 && (o[1] & 0xfe) == 18)
        // 240.0.0.0/4 — reserved for future use
        || o[0] >= 240
}

fn classify_v6(ip: Ipv6Addr) -> IpClass {
    // IPv4-mapped addresses take the classification of the embedded v4
    // address, otherwise ::ffff:10.0.0.1 would slip through as public.
    if let Some(v4) = ip.to_ipv4_mapped() {
        return classify_v4(v4);
    }
    if ip.is_unspecified() {
        return IpClass::Unspecified;
    }
    if ip.is_loopback() {
        return IpClass::Loopback;
    }
    if ip.is_unicast_link_local() {
        return IpClass::LinkLocal;
    }
    if ip.is_unique_local() {
        return IpClass::Private;
    }
    if ip.is_multicast() {
        return IpClass::Multicast;
    }
    if is_v6_reserved(ip) {
        return IpClass::Reserved;
    }
    IpClass::Public
}

fn is_v6_reserved(ip: Ipv6Addr) -> bool {
    let seg = ip.segments();
    // 2001:db8::/32 — documentation
    (seg[0] == 0x2001 && seg[1] == 0x0db8)
        // 100::/64 — discard-only
        || (seg[0] == 0x0100 && seg[1] == 0 && seg[2] == 0 && seg[3] == 0)
}
