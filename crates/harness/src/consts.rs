//! Named constants crossing the boundary to the compiled game module.
//!
//! These must match the target's compiled definitions exactly; the layout
//! dimensions live in `game-fv-layout` and are re-exported here so contract
//! code has a single import surface.

pub use game_fv_layout::{ANIMATION_STEPS, DIRECTIONS, GAITS, MAX_NAME_LENGTH};

/// Return sentinel for a successful call.
pub const SUCCESS: u32 = 170;

/// Return sentinel for a failed stat check.
pub const FAILURE: u32 = 85;

/// Maximum legal value of any character stat.
pub const MAX_STAT: u32 = 100;

/// Byte the default initializer writes across the whole name buffer (`'A'`).
pub const DEFAULT_NAME_FILL: u8 = 0x41;

/// Damage formula in the reference spec, applied in the normal-damage
/// postcondition.
pub const DAMAGE_MODEL_FN: &str = "resolveAttack";

/// Functions under contract, as named in the compiled module.
pub const FN_INIT_DEFAULT_PLAYER: &str = "initDefaultPlayer";
pub const FN_INIT_DEFAULT_SPRITE: &str = "initDefaultSprite";
pub const FN_RESOLVE_ATTACK: &str = "resolveAttack";
pub const FN_CHECK_STATS: &str = "checkStats";
