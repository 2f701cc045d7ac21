use std::fmt;

/// Cryptographic protocol an engine session speaks.
///
/// Chosen at handle creation via [`EngineConfig`]; there is no
/// process-wide default that can be mutated after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Protocol {
    /// OpenPGP, served by GnuPG.
    #[default]
    OpenPgp,
    /// CMS / X.509, served by gpgsm.
    Cms,
}

/// Configuration for opening an engine session.
///
/// All engine settings travel through this value; nothing is read from
/// global mutable state.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> trustlist::Result<()> {
/// use trustlist::{EngineConfig, GpgEngine};
///
/// let config = EngineConfig {
///     homedir: Some("/custom/gnupg".to_string()),
///     ..EngineConfig::default()
/// };
/// let engine = GpgEngine::open(config).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub protocol: Protocol,
    /// GPG home directory. If None, the engine uses its own default.
    pub homedir: Option<String>,
    /// Engine binary override. If None, the protocol's standard program
    /// is used (`gpg` for OpenPGP, `gpgsm` for CMS).
    pub program: Option<String>,
}

impl EngineConfig {
    /// The engine program this configuration resolves to.
    #[must_use]
    pub fn engine_program(&self) -> &str {
        match (&self.program, self.protocol) {
            (Some(program), _) => program,
            (None, Protocol::OpenPgp) => "gpg",
            (None, Protocol::Cms) => "gpgsm",
        }
    }
}

/// Whether a trust record describes a key or a user ID binding.
///
/// Record codes match the engine's trust record type field: 1 for a
/// key, 2 for a user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Key,
    UserId,
}

impl ItemKind {
    pub fn from_record_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Key),
            "2" => Some(Self::UserId),
            _ => None,
        }
    }

    #[must_use]
    pub fn record_code(self) -> u32 {
        match self {
            Self::Key => 1,
            Self::UserId => 2,
        }
    }
}

/// Owner trust assigned to a key's owner.
///
/// This is the user's stated confidence in the owner as an introducer
/// of other keys, not to be confused with [`Validity`], which the
/// engine computes from signatures and the web of trust.
///
/// Values correspond to GPG's ownertrust field in `--with-colons` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[non_exhaustive]
pub enum OwnerTrust {
    /// No owner trust assigned
    #[default]
    Unknown,
    /// Owner trust not yet decided
    Undefined,
    /// Owner is explicitly not trusted to introduce keys
    Never,
    /// Owner is marginally trusted
    Marginal,
    /// Owner is fully trusted
    Full,
    /// Owner is ultimately trusted (usually the user's own key)
    Ultimate,
}

impl OwnerTrust {
    pub fn from_gpg_char(c: char) -> Self {
        match c {
            '-' | 'o' => Self::Unknown,
            'q' => Self::Undefined,
            'n' => Self::Never,
            'm' => Self::Marginal,
            'f' => Self::Full,
            'u' => Self::Ultimate,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_gpg_char(self) -> char {
        match self {
            Self::Unknown => '-',
            Self::Undefined => 'q',
            Self::Never => 'n',
            Self::Marginal => 'm',
            Self::Full => 'f',
            Self::Ultimate => 'u',
        }
    }
}

/// Engine-computed validity of a key or user-ID binding.
///
/// Represents how confident the engine is that the key belongs to the
/// claimed identity, derived from signature verification and the web
/// of trust.
///
/// Values correspond to GPG's validity field in `--with-colons` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[non_exhaustive]
pub enum Validity {
    /// Validity unknown (new key or insufficient data)
    #[default]
    Unknown,
    /// Validity undefined (not yet computed)
    Undefined,
    /// Key is explicitly distrusted
    Never,
    /// Marginally valid (some trust path exists)
    Marginal,
    /// Fully valid (strong trust path)
    Full,
    /// Ultimately valid (user's own key or explicitly trusted)
    Ultimate,
    /// Key has expired
    Expired,
    /// Key has been revoked
    Revoked,
}

impl Validity {
    pub fn from_gpg_char(c: char) -> Self {
        match c {
            'o' => Self::Unknown,
            'q' => Self::Undefined,
            'n' => Self::Never,
            'm' => Self::Marginal,
            'f' => Self::Full,
            'u' => Self::Ultimate,
            'e' => Self::Expired,
            'r' => Self::Revoked,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_gpg_char(self) -> char {
        match self {
            Self::Unknown => 'o',
            Self::Undefined => 'q',
            Self::Never => 'n',
            Self::Marginal => 'm',
            Self::Full => 'f',
            Self::Ultimate => 'u',
            Self::Expired => 'e',
            Self::Revoked => 'r',
        }
    }
}

/// One entry of a trust-list enumeration.
///
/// Produced by [`TrustQuery::next`] on each successful pull. Items are
/// immutable and owned by the caller; the query holds no reference to
/// them after handing one out.
///
/// [`TrustQuery::next`]: crate::TrustQuery::next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustItem {
    /// Depth of this entry in the trust chain.
    pub level: u32,
    /// Fingerprint or long key ID of the key.
    pub keyid: String,
    pub kind: ItemKind,
    pub owner_trust: OwnerTrust,
    pub validity: Validity,
    /// Associated identity string; empty for key records.
    pub name: String,
}

impl fmt::Display for TrustItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "l={} k={} t={} o={} v={} u={}",
            self.level,
            self.keyid,
            self.kind.record_code(),
            self.owner_trust.as_gpg_char(),
            self.validity.as_gpg_char(),
            self.name
        )
    }
}
