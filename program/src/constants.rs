//! Seeds, limits, program ids and the aggregator discriminator whitelist.

use delegate_common::crypto::{program_id_from_name, PublicKey};
use lazy_static::lazy_static;

pub const VAULT_SEED: &str = "jupiter-delegate-vault";

pub const CONFIG_SEED: &str = "jupiter-delegate-config";

pub const ACCESS_SEED: &str = "jupiter-delegate-access";

pub const MINIMUM_TRADE_INTERVAL: i64 = 0; // 0 seconds

// Maximum nested cross-program invocation depth
pub const MAX_INVOKE_DEPTH: usize = 4;

lazy_static! {
    /// The delegate vault program
    pub static ref ID: PublicKey = program_id_from_name("jupiter-delegate");
    /// Token program holding mints and token accounts
    pub static ref TOKEN_PROGRAM_ID: PublicKey = program_id_from_name("token");
    /// Namespace under which associated token addresses are derived
    pub static ref ASSOCIATED_TOKEN_PROGRAM_ID: PublicKey = program_id_from_name("associated-token");

    pub static ref JUPITER_PROGRAM_ID: PublicKey = program_id_from_name("jupiter-aggregator-v6");
    pub static ref JUPITER_ORDER_ENGINE_PROGRAM_ID: PublicKey = program_id_from_name("jupiter-order-engine");
    pub static ref DFLOW_PROGRAM_ID: PublicKey = program_id_from_name("dflow-aggregator");
    pub static ref OKX_PROGRAM_ID: PublicKey = program_id_from_name("okx-aggregator");
    pub static ref JUPITER_PERPETUALS_PROGRAM_ID: PublicKey = program_id_from_name("jupiter-perpetuals");
}

pub type Discriminator = [u8; 8];

pub const DISCRIMINATOR_JUPITER_AGGREGATOR_SHARED_ACCOUNTS_ROUTE: Discriminator =
    [193, 32, 155, 51, 65, 214, 156, 129];

pub const DISCRIMINATOR_JUPITER_AGGREGATOR_SHARED_ACCOUNTS_ROUTE_V2: Discriminator =
    [53, 96, 229, 202, 216, 187, 250, 24];

pub const DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE: Discriminator = [229, 23, 203, 151, 122, 227, 173, 42];

pub const DISCRIMINATOR_JUPITER_AGGREGATOR_ROUTE_V2: Discriminator =
    [187, 100, 250, 204, 49, 196, 175, 20];

pub const DISCRIMINATOR_JUPITER_ORDER_ENGINE_FILL: Discriminator = [168, 96, 183, 163, 92, 10, 40, 160];

pub const DISCRIMINATOR_OKX_SWAP_TOB_V3: Discriminator = [63, 114, 246, 131, 51, 2, 247, 29];

pub const DISCRIMINATOR_OKX_SWAP_V3: Discriminator = [240, 224, 38, 33, 176, 31, 241, 175];

pub const DISCRIMINATOR_OKX_SWAP_TOB_V3_WITH_RECEIVER: Discriminator =
    [14, 191, 44, 246, 142, 225, 224, 157];

pub const DISCRIMINATOR_OKX_SWAP: Discriminator = [248, 198, 158, 145, 225, 117, 135, 200];

pub const DISCRIMINATOR_DFLOW_SWAP: Discriminator = [248, 198, 158, 145, 225, 117, 135, 200];

pub const DISCRIMINATOR_DFLOW_SWAP2: Discriminator = [65, 75, 63, 76, 235, 91, 91, 136];

// add_liquidity2
pub const DISCRIMINATOR_PERPETUALS_ADD_LIQUIDITY: Discriminator = [228, 162, 78, 28, 70, 219, 116, 115];

// remove_liquidity2
pub const DISCRIMINATOR_PERPETUALS_REMOVE_LIQUIDITY: Discriminator =
    [230, 215, 82, 127, 241, 101, 227, 146];
