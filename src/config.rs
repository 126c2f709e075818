use std::env;

use crate::chains::Chain;

/// Ravencoin provider pair: explorer API for address activity, plus the
/// authenticated JSON-RPC node used to resolve block hashes.
#[derive(Debug, Clone)]
pub struct RavencoinConfig {
    pub address: String,
    pub explorer_api_url: String,
    pub rpc_url: String,
    pub rpc_user: String,
    pub rpc_pass: String,
}

/// Tatum-style REST provider (key in a header, page size in the query).
#[derive(Debug, Clone)]
pub struct TatumConfig {
    pub address: String,
    pub api_url: String,
    pub api_key: String,
    pub page_size: u32,
}

/// Esplora-style public explorer (no key).
#[derive(Debug, Clone)]
pub struct EsploraConfig {
    pub address: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ravencoin: RavencoinConfig,
    pub bcash: TatumConfig,
    pub dogecoin: TatumConfig,
    pub litecoin: EsploraConfig,
    pub prices: PriceConfig,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Read configuration from the environment. Endpoints and tracked
    /// addresses have working testnet defaults; credentials default to empty
    /// and must come from the environment.
    pub fn from_env() -> Self {
        let tatum_api_key = env_or("TATUM_API_KEY", "");

        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            ravencoin: RavencoinConfig {
                address: env_or("RVN_ADDRESS", "mvwrYV23K5ZB2DFXjaiNHkB66j97gnRorK"),
                explorer_api_url: env_or("RVN_EXPLORER_API_URL", "https://rvnt.cryptoscope.io/api"),
                rpc_url: env_or("RVN_RPC_URL", "http://34.133.26.97:18766/"),
                rpc_user: env_or("RVN_RPC_USER", "ravencoinrpc"),
                rpc_pass: env_or("RVN_RPC_PASS", ""),
            },
            bcash: TatumConfig {
                address: env_or("BCH_ADDRESS", "bchtest:qq2mudwqwfcel7aah0jcew5cp9twkjsv5y68ep4jl6"),
                api_url: env_or("BCH_API_URL", "https://api.tatum.io/v3/bcash"),
                api_key: tatum_api_key.clone(),
                page_size: 50,
            },
            dogecoin: TatumConfig {
                address: env_or("DOGE_ADDRESS", "ndWSGfKCsDFadmMvfdSV6Dj2WFYgPkXnLm"),
                api_url: env_or("DOGE_API_URL", "https://api.tatum.io/v3/dogecoin"),
                api_key: tatum_api_key,
                page_size: 50,
            },
            litecoin: EsploraConfig {
                address: env_or("LTC_ADDRESS", "tltc1qxj48dsj9wkyr8j6p30x2k8wq88z9tdtra6xewg"),
                api_url: env_or("LTC_API_URL", "https://litecoinspace.org/testnet/api"),
            },
            prices: PriceConfig {
                api_url: env_or("PRICE_API_URL", "https://api.coingecko.com/api/v3"),
                api_key: env_or("COINGECKO_API_KEY", ""),
            },
        }
    }

    /// Tracked mining address for a chain (used by the live tx endpoints).
    pub fn address_for(&self, chain: Chain) -> &str {
        match chain {
            Chain::RavencoinTestnet => &self.ravencoin.address,
            Chain::BcashTestnet => &self.bcash.address,
            Chain::DogecoinTestnet => &self.dogecoin.address,
            Chain::LitecoinTestnet => &self.litecoin.address,
        }
    }
}
