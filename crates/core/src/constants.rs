use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// SPL Token program, the owner of every fungible token account we read.
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Wrapped SOL mint, used as the asset id of the native pseudo-holding.
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// Native SOL decimals (lamports per SOL = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// USDC mint
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// USDT mint
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

/// Assets classified as Stable regardless of market data.
pub const KNOWN_STABLE_ASSETS: &[&str] = &[NATIVE_MINT, USDT_MINT, USDC_MINT];

/// Mint address suffix of the designated high-risk category (pump.fun launches).
pub const HIGH_RISK_MINT_SUFFIX: &str = "pump";

/// Market cap at or above which a holding is Low risk.
pub const LOW_RISK_MARKET_CAP: Decimal = dec!(100000000);

/// Market cap at or above which a holding is Medium risk.
pub const MEDIUM_RISK_MARKET_CAP: Decimal = dec!(20000000);

/// Upper bound of the aggregate risk score.
pub const MAX_RISK_SCORE: Decimal = dec!(100);

/// Default overall deadline for one portfolio query, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;
