//! Network address, port, email and version types.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::num::IntErrorKind;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{CastError, CastResult};
use crate::registry::TypeSpec;
use crate::value::Value;
use crate::version::SemVerMatch;

/// Resolves host names for the address types.
///
/// Only called for input that is not an address literal and is a
/// syntactically valid host name.
pub trait HostResolver: Send + Sync + fmt::Debug {
    /// Returns every address `host` resolves to, in resolver order.
    fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolves through the platform resolver (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        Ok((host, 0).to_socket_addrs()?.map(|addr| addr.ip()).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    V4,
    V6,
}

impl Family {
    fn matches(self, addr: &IpAddr) -> bool {
        match self {
            Self::V4 => addr.is_ipv4(),
            Self::V6 => addr.is_ipv6(),
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Self::V4 => "ipv4_address",
            Self::V6 => "ipv6_address",
        }
    }
}

pub(crate) fn specs(resolver: Arc<dyn HostResolver>) -> Vec<TypeSpec> {
    let v4_resolver = Arc::clone(&resolver);
    vec![
        TypeSpec::new("ipv4_address").parser(move |raw| {
            parse_address(raw, Family::V4, v4_resolver.as_ref()).map(Value::Ip)
        }),
        TypeSpec::new("ipv6_address").parser(move |raw| {
            parse_address(raw, Family::V6, resolver.as_ref()).map(Value::Ip)
        }),
        TypeSpec::new("network_port")
            .alias("port")
            .parser(|raw| parse_port(raw).map(|port| Value::Integer(i64::from(port)))),
        TypeSpec::new("email_address").parser(|raw| parse_email(raw).map(Value::from)),
        TypeSpec::new("version")
            .alias("semver")
            .parser(|raw| parse_version(raw).map(Value::Version)),
    ]
}

// ============================================================================
// ADDRESSES
// ============================================================================

fn parse_address(raw: &str, family: Family, resolver: &dyn HostResolver) -> CastResult<IpAddr> {
    let not_an_ip = || CastError::not_convertible(family.type_name(), "non-ip value");
    let input = raw.trim();

    let literal = input
        .parse::<IpAddr>()
        .ok()
        .or_else(|| parse_inet_aton(input).map(IpAddr::V4));
    if let Some(addr) = literal {
        return if family.matches(&addr) {
            Ok(addr)
        } else {
            Err(not_an_ip())
        };
    }

    if !is_hostname(input) {
        return Err(not_an_ip());
    }

    let resolved = resolver.resolve(input).map_err(|err| {
        tracing::debug!(host = %input, error = %err, "Host name did not resolve");
        not_an_ip()
    })?;
    let addr = resolved
        .into_iter()
        .find(|addr| family.matches(addr))
        .ok_or_else(not_an_ip)?;

    tracing::trace!(host = %input, address = %addr, "Resolved host name");
    Ok(addr)
}

/// Dotted-quad IPv4 with `inet_aton` part syntax: each of the four parts
/// may be decimal, octal (leading `0`) or hex (`0x`), and must fit in a
/// byte.
fn parse_inet_aton(input: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = input.split('.');
    for octet in &mut octets {
        let part = parts.next()?;
        let value = if let Some(hex) = part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()?
        } else if part.len() > 1 && part.starts_with('0') {
            u32::from_str_radix(&part[1..], 8).ok()?
        } else {
            part.parse::<u32>().ok()?
        };
        *octet = u8::try_from(value).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// RFC 1123 host name syntax. A trailing dot is allowed.
fn is_hostname(input: &str) -> bool {
    let host = input.strip_suffix('.').unwrap_or(input);
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

// ============================================================================
// PORTS
// ============================================================================

/// Strictly parses a port number.
///
/// The whole input must be an integer (`_` separators and `0x`/`0o`/`0b`
/// prefixes allowed); anything else is not convertible. Integers outside
/// `0..=65535` are not allowed.
pub fn parse_port(raw: &str) -> CastResult<u16> {
    let value = parse_strict_int(raw)
        .ok_or_else(|| CastError::not_convertible("network_port", "non-numeric value"))?;
    u16::try_from(value).map_err(|_| CastError::not_allowed("value out of range"))
}

fn parse_strict_int(raw: &str) -> Option<i128> {
    let text = raw.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    // Reject a second sign, which from_str_radix would accept.
    if cleaned.starts_with(['+', '-']) {
        return None;
    }
    // Overflow still means "an integer", just out of any port's range.
    let magnitude = match i128::from_str_radix(&cleaned, radix) {
        Ok(magnitude) => magnitude,
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => i128::MAX,
        Err(_) => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

// ============================================================================
// EMAIL
// ============================================================================

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("email pattern is valid")
});

/// Checks `raw` against a simple `local@domain` pattern and returns it
/// unchanged.
pub fn parse_email(raw: &str) -> CastResult<&str> {
    if EMAIL.is_match(raw) {
        Ok(raw)
    } else {
        Err(CastError::not_convertible("email_address", "not an email"))
    }
}

// ============================================================================
// VERSIONS
// ============================================================================

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)(?:-(?P<prerelease>(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+(?P<buildmetadata>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("semver pattern is valid")
});

/// Matches `raw` against the semver.org regex and returns its captures.
pub fn parse_version(raw: &str) -> CastResult<SemVerMatch> {
    let not_semver = || CastError::not_convertible("version", "not a semver-compliant value");
    let caps = SEMVER.captures(raw).ok_or_else(not_semver)?;
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_owned());

    Ok(SemVerMatch {
        major: group("major").ok_or_else(not_semver)?,
        minor: group("minor").ok_or_else(not_semver)?,
        patch: group("patch").ok_or_else(not_semver)?,
        prerelease: group("prerelease"),
        build_metadata: group("buildmetadata"),
    })
}
