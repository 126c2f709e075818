use serde::{Deserialize, Serialize};
use std::fmt;

/// The four testnets we track. Closed set; the wire id (serde rename) is the
/// only string form that ever leaves this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    #[serde(rename = "ravencoin-testnet")]
    RavencoinTestnet,
    #[serde(rename = "bcash-testnet")]
    BcashTestnet,
    #[serde(rename = "dogecoin-testnet")]
    DogecoinTestnet,
    #[serde(rename = "litecoin-testnet")]
    LitecoinTestnet,
}

impl Chain {
    pub const ALL: [Chain; 4] = [
        Chain::RavencoinTestnet,
        Chain::BcashTestnet,
        Chain::DogecoinTestnet,
        Chain::LitecoinTestnet,
    ];

    /// Stable identifier used in URLs, query filters and persisted rows.
    pub fn id(self) -> &'static str {
        match self {
            Chain::RavencoinTestnet => "ravencoin-testnet",
            Chain::BcashTestnet => "bcash-testnet",
            Chain::DogecoinTestnet => "dogecoin-testnet",
            Chain::LitecoinTestnet => "litecoin-testnet",
        }
    }

    pub fn from_id(id: &str) -> Option<Chain> {
        Chain::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Chain::RavencoinTestnet => "Ravencoin Testnet",
            Chain::BcashTestnet => "Bitcoin Cash Testnet",
            Chain::DogecoinTestnet => "Dogecoin Testnet",
            Chain::LitecoinTestnet => "Litecoin Testnet",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Chain::RavencoinTestnet => "RVN",
            Chain::BcashTestnet => "BCH",
            Chain::DogecoinTestnet => "DOGE",
            Chain::LitecoinTestnet => "LTC",
        }
    }

    /// Asset id on the market-data provider (mainnet asset; testnets have no
    /// market of their own).
    pub fn market_asset_id(self) -> &'static str {
        match self {
            Chain::RavencoinTestnet => "ravencoin",
            Chain::BcashTestnet => "bitcoin-cash",
            Chain::DogecoinTestnet => "dogecoin",
            Chain::LitecoinTestnet => "litecoin",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
