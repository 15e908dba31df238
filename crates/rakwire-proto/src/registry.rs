//! Packet registry and first-byte dispatch.
//!
//! A registry maps one-byte IDs to decoders. It is filled once from an
//! explicit registration list and only read afterwards, so a shared
//! reference is all concurrent decoders need.

use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::{
    errors::{ProtocolError, Result},
    packet::Packet,
    packets::AnyPacket,
};

type DecodeFn<T> = fn(&[u8]) -> Result<T>;

struct Entry<T> {
    name: &'static str,
    decode: DecodeFn<T>,
}

/// Maps packet IDs to the decoder of the packet type registered for them.
///
/// `T` is the record every decoder produces; the handshake set decodes into
/// [`AnyPacket`]. Custom sets can use their own sum type.
pub struct PacketRegistry<T = AnyPacket> {
    entries: HashMap<u8, Entry<T>>,
}

impl<T> PacketRegistry<T> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Register packet type `P` under [`P::ID`](Packet::ID).
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DuplicateId`] if the ID is already taken.
    /// The registry is left unchanged.
    pub fn register<P>(&mut self) -> Result<&mut Self>
    where
        P: Packet + Into<T>,
    {
        if let Some(existing) = self.entries.get(&P::ID) {
            tracing::debug!(
                id = P::ID,
                existing = existing.name,
                rejected = P::NAME,
                "duplicate packet registration"
            );
            return Err(ProtocolError::DuplicateId(P::ID));
        }

        self.entries.insert(P::ID, Entry { name: P::NAME, decode: decode_as::<P, T> });
        tracing::debug!(id = P::ID, packet = P::NAME, "registered packet");
        Ok(self)
    }

    /// Whether a packet type is registered for `id`.
    #[must_use]
    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    /// Name of the packet type registered for `id`.
    #[must_use]
    pub fn name(&self, id: u8) -> Option<&'static str> {
        self.entries.get(&id).map(|entry| entry.name)
    }

    /// Number of registered packet types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identify a datagram by its first byte and decode it.
    ///
    /// The chosen packet type re-checks the ID and rejects trailing bytes.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::EndOfStream`] if `bytes` is empty
    /// - [`ProtocolError::UnknownPacket`] if no type is registered for the
    ///   first byte
    /// - any error from the packet's own decode
    pub fn decode(&self, bytes: &[u8]) -> Result<T> {
        let Some(&id) = bytes.first() else {
            return Err(ProtocolError::EndOfStream { requested: 1, remaining: 0 });
        };

        let Some(entry) = self.entries.get(&id) else {
            tracing::debug!(id, len = bytes.len(), "unknown packet id");
            return Err(ProtocolError::UnknownPacket(id));
        };

        tracing::trace!(id, packet = entry.name, len = bytes.len(), "dispatching packet");
        (entry.decode)(bytes)
    }
}

impl PacketRegistry<AnyPacket> {
    /// Registry holding the full handshake packet set.
    pub fn handshake() -> Result<Self> {
        let mut registry = Self::new();
        AnyPacket::register_all(&mut registry)?;
        Ok(registry)
    }
}

impl<T> Default for PacketRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PacketRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.entries.iter().map(|(id, entry)| (*id, entry.name)).collect();
        ids.sort_unstable();
        f.debug_struct("PacketRegistry").field("packets", &ids).finish()
    }
}

fn decode_as<P, T>(bytes: &[u8]) -> Result<T>
where
    P: Packet + Into<T>,
{
    P::decode(bytes).map(Into::into)
}

static REGISTRY: LazyLock<Result<PacketRegistry>> = LazyLock::new(PacketRegistry::handshake);

/// The process-wide handshake registry, built on first use.
///
/// # Errors
///
/// Fails only if the built-in packet set declares an ID twice.
pub fn registry() -> Result<&'static PacketRegistry> {
    REGISTRY.as_ref().map_err(Clone::clone)
}

/// Decode one datagram with the handshake registry.
///
/// # Errors
///
/// See [`PacketRegistry::decode`].
pub fn decode_packet(bytes: &[u8]) -> Result<AnyPacket> {
    registry()?.decode(bytes)
}
