//! The static MAC to IPv4 mapping.
//!
//! The textual form is a comma-separated list of `MAC=IPv4` pairs, e.g.
//! `52:54:00:12:34:56=192.168.1.10, aa:bb:cc:dd:ee:ff = 192.168.1.11`.

use std::{
    collections::{hash_map, HashMap},
    net::Ipv4Addr,
    str::FromStr,
};

use eui48::{MacAddress, EUI48LEN};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMapping {
    entries                 : HashMap<MacAddress, Ipv4Addr>,
}

impl StaticMapping {
    pub fn get(&self, mac: &MacAddress) -> Option<Ipv4Addr> {
        self.entries.get(mac).copied()
    }

    pub fn iter(&self) -> hash_map::Iter<MacAddress, Ipv4Addr> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for StaticMapping {
    type Err = Error;

    /// A later pair for the same MAC replaces the earlier one.
    fn from_str(src: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for pair in src.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let mut parts = pair.splitn(2, '=');
            let mac = parts.next().unwrap_or_default().trim();
            let address = match parts.next() {
                Some(address) => address.trim(),
                None => return Err(Error::MissingSeparator(pair.to_owned())),
            };

            let mac = parse_mac(mac).ok_or_else(|| Error::InvalidMac(mac.to_owned()))?;
            let address = Ipv4Addr::from_str(address).map_err(|_| Error::InvalidIpv4(address.to_owned()))?;

            if let Some(previous) = entries.insert(mac, address) {
                warn!("{} is mapped twice, {} replaces {}", mac.to_hex_string(), address, previous);
            }
        }

        Ok(StaticMapping { entries })
    }
}

/// Parses `xx:xx:xx:xx:xx:xx`, `xx-xx-xx-xx-xx-xx` or `xxxx.xxxx.xxxx`.
///
/// Every group must have all its hex digits and the separator must not change.
fn parse_mac(src: &str) -> Option<MacAddress> {
    let (separator, group_length) = match src.as_bytes().get(2).copied()? {
        separator @ b':' | separator @ b'-' => (separator as char, 2),
        _ => match src.as_bytes().get(4).copied()? {
            b'.' => ('.', 4),
            _ => return None,
        },
    };

    let mut digits = String::with_capacity(EUI48LEN * 2);
    for group in src.split(separator) {
        if group.len() != group_length || !group.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        digits.push_str(group);
    }
    if digits.len() != EUI48LEN * 2 {
        return None;
    }

    let mut octets = [0u8; EUI48LEN];
    for (index, octet) in octets.iter_mut().enumerate() {
        *octet = u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).ok()?;
    }
    Some(MacAddress::new(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(src: &str) -> MacAddress {
        MacAddress::parse_str(src).unwrap()
    }

    #[test]
    fn parses_single_pair() {
        let mapping: StaticMapping = "52:54:00:12:34:56=192.168.1.10".parse().unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get(&mac("52:54:00:12:34:56")), Some(Ipv4Addr::new(192,168,1,10)));
    }

    #[test]
    fn parses_pairs_with_whitespace() {
        let mapping: StaticMapping =
            " 52:54:00:12:34:56 = 192.168.1.10 ,aa:bb:cc:dd:ee:ff=192.168.1.11,, "
                .parse()
                .unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(&mac("52:54:00:12:34:56")), Some(Ipv4Addr::new(192,168,1,10)));
        assert_eq!(mapping.get(&mac("AA:BB:CC:DD:EE:FF")), Some(Ipv4Addr::new(192,168,1,11)));
        assert_eq!(mapping.get(&mac("aa:bb:cc:dd:ee:00")), None);
    }

    #[test]
    fn parses_empty_text() {
        let mapping: StaticMapping = "".parse().unwrap();
        assert!(mapping.is_empty());
        assert_eq!(mapping.iter().count(), 0);
    }

    #[test]
    fn rejects_pair_without_separator() {
        match "52:54:00:12:34:56".parse::<StaticMapping>() {
            Err(Error::MissingSeparator(pair)) => assert_eq!(pair, "52:54:00:12:34:56"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_mac() {
        match "aa:bb=192.168.1.10".parse::<StaticMapping>() {
            Err(Error::InvalidMac(mac)) => assert_eq!(mac, "aa:bb"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_partial_mac_literals() {
        for literal in &[
            "52:54:00:12:34:5G",
            "52:54:00:12:34:5",
            "52:54:00:12:3456:",
            "52-54:00.12:34:56",
            "52:54:00:12:34:56:78",
            "525400123456",
            "5254.0012.345",
            ":52:54:00:12:34:5",
        ] {
            match format!("{}=10.0.0.1", literal).parse::<StaticMapping>() {
                Err(Error::InvalidMac(mac)) => assert_eq!(&mac, literal),
                other => panic!("{} must be rejected, got {:?}", literal, other),
            }
        }
    }

    #[test]
    fn accepts_every_mac_notation() {
        let expected = Some(Ipv4Addr::new(10,0,0,1));
        for literal in &["52:54:00:ab:CD:56", "52-54-00-AB-cd-56", "5254.00ab.cd56"] {
            let mapping: StaticMapping = format!("{}=10.0.0.1", literal).parse().unwrap();
            assert_eq!(mapping.get(&MacAddress::new([0x52, 0x54, 0x00, 0xab, 0xcd, 0x56])), expected);
        }
    }

    #[test]
    fn rejects_invalid_octet() {
        match "52:54:00:12:34:56=999.168.1.10".parse::<StaticMapping>() {
            Err(Error::InvalidIpv4(address)) => assert_eq!(address, "999.168.1.10"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn one_bad_pair_fails_the_whole_list() {
        assert!("52:54:00:12:34:56=192.168.1.10,aa:bb:cc:dd:ee:ff".parse::<StaticMapping>().is_err());
    }

    #[test]
    fn later_pair_wins() {
        let mapping: StaticMapping = "52:54:00:12:34:56=10.0.0.2,52:54:00:12:34:56=10.0.0.3".parse().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get(&mac("52:54:00:12:34:56")), Some(Ipv4Addr::new(10,0,0,3)));
    }
}
