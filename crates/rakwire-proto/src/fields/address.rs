//! IPv4 socket address field.

use std::{
    fmt,
    net::{AddrParseError, Ipv4Addr, SocketAddrV4},
    str::FromStr,
};

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::{Field, UnsignedShortField};
use crate::{cursor::ByteCursor, errors::Result};

/// An endpoint as carried in the handshake.
///
/// The version byte is kept as read so re-encoding reproduces the input;
/// it is `4` for every address a conforming peer sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// IPv4 address
    pub ip: Ipv4Addr,
    /// UDP port
    pub port: u16,
    /// Address family marker
    pub version: u8,
}

impl Address {
    /// Version byte for IPv4 addresses.
    pub const IPV4: u8 = 4;

    /// IPv4 address with the standard version byte.
    #[must_use]
    pub const fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self { ip, port, version: Self::IPV4 }
    }
}

impl From<SocketAddrV4> for Address {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(*addr.ip(), addr.port())
    }
}

impl From<Address> for SocketAddrV4 {
    fn from(addr: Address) -> Self {
        Self::new(addr.ip, addr.port)
    }
}

impl FromStr for Address {
    type Err = AddrParseError;

    /// Parse `"a.b.c.d:port"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<SocketAddrV4>().map(Self::from)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Seven-byte address: version, four octets, Big Endian port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AddressField;

impl Field for AddressField {
    type Value = Address;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<Address> {
        let [version] = cursor.read_array()?;
        let octets: [u8; 4] = cursor.read_array()?;
        let port = UnsignedShortField.decode(cursor)?;
        Ok(Address { ip: Ipv4Addr::from(octets), port, version })
    }

    fn encode(&self, value: &Address, dst: &mut impl BufMut) -> Result<()> {
        dst.put_u8(value.version);
        dst.put_slice(&value.ip.octets());
        dst.put_u16(value.port);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::ProtocolError;

    #[test]
    fn loopback() {
        let addr = Address::new(Ipv4Addr::LOCALHOST, 19132);
        let wire = hex!("047f0000014abc");

        assert_eq!(AddressField.encode_to_bytes(&addr).unwrap(), &wire[..]);
        assert_eq!(AddressField.decode_bytes(&wire), Ok(addr));
    }

    #[test]
    fn private_network() {
        let addr: Address = "192.168.0.42:29132".parse().unwrap();
        let wire = hex!("04c0a8002a71cc");

        assert_eq!(addr.version, Address::IPV4);
        assert_eq!(AddressField.encode_to_bytes(&addr).unwrap(), &wire[..]);
        assert_eq!(AddressField.decode_bytes(&wire), Ok(addr));
    }

    #[test]
    fn version_byte_is_preserved() {
        let wire = hex!("06c0a8002a71cc");
        let addr = AddressField.decode_bytes(&wire).unwrap();
        assert_eq!(addr.version, 6);
        assert_eq!(AddressField.encode_to_bytes(&addr).unwrap(), &wire[..]);
    }

    #[test]
    fn short_address_fails() {
        assert_eq!(
            AddressField.decode_bytes(&hex!("047f000001")),
            Err(ProtocolError::EndOfStream { requested: 2, remaining: 0 })
        );
    }

    #[test]
    fn display_and_socket_addr() {
        let addr = Address::new(Ipv4Addr::new(10, 0, 0, 1), 19132);
        assert_eq!(addr.to_string(), "10.0.0.1:19132");
        assert_eq!(SocketAddrV4::from(addr), "10.0.0.1:19132".parse().unwrap());
        assert!("10.0.0.256:1".parse::<Address>().is_err());
    }
}
