//! Contracts for the four game functions.
//!
//! Each contract allocates symbolic inputs matching the target's memory
//! layout, constrains them with preconditions, declares the call, and
//! asserts exact poststate values and return codes. Where the target
//! branches on input ranges, one contract instance exists per branch, with
//! boundary predicates chosen so the cases jointly cover the legal input
//! domain.

use std::fmt;

use game_fv_contract::{ContractSpec, SpecError, Term, Value};
use game_fv_layout::{LayoutModel, Shape, frames_shape};

use crate::consts::{
    DAMAGE_MODEL_FN, DEFAULT_NAME_FILL, FAILURE, FN_CHECK_STATS, FN_INIT_DEFAULT_PLAYER,
    FN_INIT_DEFAULT_SPRITE, FN_RESOLVE_ATTACK, MAX_NAME_LENGTH, MAX_STAT, SUCCESS,
};

/// Identity of one contract instance: the function plus an optional case
/// label for multi-case contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractId {
    pub function: &'static str,
    pub case: Option<&'static str>,
}

impl ContractId {
    pub fn plain(function: &'static str) -> Self {
        Self {
            function,
            case: None,
        }
    }

    pub fn with_case(function: &'static str, case: &'static str) -> Self {
        Self {
            function,
            case: Some(case),
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.case {
            Some(case) => write!(f, "{}[{case}]", self.function),
            None => write!(f, "{}", self.function),
        }
    }
}

/// The three disjoint behaviors of `resolveAttack`, selected once at
/// contract-construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackCase {
    /// The defender's defense absorbs the whole attack: `def >= atk`.
    Mitigated,
    /// The attack overwhelms health and defense together: `hp + def <= atk`.
    ImmediateKo,
    /// Anything else follows the damage formula: `def < atk && hp + def > atk`.
    Normal,
}

impl AttackCase {
    pub const ALL: [AttackCase; 3] =
        [AttackCase::Mitigated, AttackCase::ImmediateKo, AttackCase::Normal];

    pub fn label(&self) -> &'static str {
        match self {
            AttackCase::Mitigated => "mitigated",
            AttackCase::ImmediateKo => "immediate-ko",
            AttackCase::Normal => "normal",
        }
    }
}

impl fmt::Display for AttackCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two behaviors of `checkStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsCase {
    /// Every stat is within the cap; the check reports success.
    Pass,
    /// At least one stat exceeds the cap; the check reports failure.
    Fail,
}

impl StatsCase {
    pub const ALL: [StatsCase; 2] = [StatsCase::Pass, StatsCase::Fail];

    pub fn label(&self) -> &'static str {
        match self {
            StatsCase::Pass => "pass",
            StatsCase::Fail => "fail",
        }
    }
}

impl fmt::Display for StatsCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contract for `uint32_t initDefaultPlayer(player_t *player)`.
///
/// The function takes a `player_t`, a typedef alias of `character_t`; the
/// allocation goes through the alias so the layout's alias table, not name
/// identity, resolves the record.
pub fn init_default_player(layout: &LayoutModel) -> Result<ContractSpec, SpecError> {
    let mut spec = ContractSpec::new(FN_INIT_DEFAULT_PLAYER, layout.clone());
    let player = spec.alloc(Shape::record("player_t"))?;

    spec.execute(vec![Value::ptr(&player)])?;

    spec.points_to(
        player.field("name"),
        Value::expr(Term::repeat_byte(DEFAULT_NAME_FILL, MAX_NAME_LENGTH)),
    )?;
    spec.points_to(player.field("level"), Value::u32(1))?;
    spec.points_to(player.field("hp"), Value::u32(10))?;
    spec.points_to(player.field("atk"), Value::u32(5))?;
    spec.points_to(player.field("def"), Value::u32(4))?;
    spec.points_to(player.field("spd"), Value::u32(3))?;
    spec.returns(Term::u32(SUCCESS))?;

    spec.finish()
}

/// Contract for `uint32_t initDefaultSprite(character_t *character,
/// sprite_t *sprite)`.
///
/// The sprite's embedded character pointer starts at a placeholder
/// allocation and must point at the first argument afterwards; the frame
/// store is zeroed and the position reset.
pub fn init_default_sprite(layout: &LayoutModel) -> Result<ContractSpec, SpecError> {
    let mut spec = ContractSpec::new(FN_INIT_DEFAULT_SPRITE, layout.clone());

    let character = spec.alloc(Shape::record("character_t"))?;
    let placeholder = spec.alloc(Shape::record("character_t"))?;
    let frames = spec.fresh_var(frames_shape(), "sprite.frames")?;
    let x_pos = spec.fresh_var(Shape::u32(), "sprite.xPos")?;
    let y_pos = spec.fresh_var(Shape::u32(), "sprite.yPos")?;
    let sprite = spec.alloc_with(
        Shape::record("sprite_t"),
        Value::record(vec![
            Value::ptr(&placeholder),
            Value::sym(&frames),
            Value::sym(&x_pos),
            Value::sym(&y_pos),
        ]),
    )?;

    spec.execute(vec![Value::ptr(&character), Value::ptr(&sprite)])?;

    spec.points_to(
        sprite.place(),
        Value::record(vec![
            Value::ptr(&character),
            Value::expr(Term::zero(frames_shape())),
            Value::u32(1),
            Value::u32(2),
        ]),
    )?;
    spec.returns(Term::u32(SUCCESS))?;

    spec.finish()
}

/// Contract for `void resolveAttack(character_t *target, uint32_t atk)`,
/// one instance per [`AttackCase`].
///
/// All cases share the bounds `atk <= MAX_STAT`, `target->hp <= MAX_STAT`,
/// `target->def <= MAX_STAT`. The boundary predicates put `def == atk` in
/// the mitigated case only.
pub fn resolve_attack(layout: &LayoutModel, case: AttackCase) -> Result<ContractSpec, SpecError> {
    let mut spec = ContractSpec::new(FN_RESOLVE_ATTACK, layout.clone());
    let (target, target_p) = spec.fresh_and_bind(Shape::record("character_t"), "target")?;
    let atk = spec.fresh_var(Shape::u32(), "atk")?;

    let h = Term::var(&target).field("hp");
    let d = Term::var(&target).field("def");
    let a = Term::var(&atk);

    spec.precondition(a.clone().le(Term::u32(MAX_STAT)))?;
    spec.precondition(h.clone().le(Term::u32(MAX_STAT)))?;
    spec.precondition(d.clone().le(Term::u32(MAX_STAT)))?;

    match case {
        AttackCase::Mitigated => {
            spec.precondition(d.clone().ge(a.clone()))?;
        }
        AttackCase::ImmediateKo => {
            spec.precondition(h.clone().add(d.clone()).le(a.clone()))?;
        }
        AttackCase::Normal => {
            spec.precondition(d.clone().lt(a.clone()))?;
            spec.precondition(h.clone().add(d.clone()).gt(a.clone()))?;
        }
    }

    spec.execute(vec![Value::ptr(&target_p), Value::sym(&atk)])?;

    let remaining_hp = match case {
        AttackCase::Mitigated => h,
        AttackCase::ImmediateKo => Term::u32(0),
        AttackCase::Normal => Term::apply(DAMAGE_MODEL_FN, vec![h, d, a]),
    };
    spec.points_to(target_p.field("hp"), Value::expr(remaining_hp))?;
    spec.returns_void()?;

    spec.finish()
}

/// Contract for `uint32_t checkStats(character_t *character)`, one instance
/// per [`StatsCase`].
///
/// The fail case constrains the prestate with a disjunction: any single
/// over-cap stat is enough to trigger the failure path.
pub fn check_stats(layout: &LayoutModel, case: StatsCase) -> Result<ContractSpec, SpecError> {
    let mut spec = ContractSpec::new(FN_CHECK_STATS, layout.clone());
    let (character, character_p) = spec.fresh_and_bind(Shape::record("character_t"), "character")?;

    let stat = |name: &str| Term::var(&character).field(name);
    let stats = ["hp", "atk", "def", "spd"];

    match case {
        StatsCase::Pass => {
            for name in stats {
                spec.precondition(stat(name).le(Term::u32(MAX_STAT)))?;
            }
        }
        StatsCase::Fail => {
            spec.precondition(Term::any(
                stats
                    .iter()
                    .map(|name| stat(name).gt(Term::u32(MAX_STAT)))
                    .collect(),
            ))?;
        }
    }

    spec.execute(vec![Value::ptr(&character_p)])?;

    let sentinel = match case {
        StatsCase::Pass => SUCCESS,
        StatsCase::Fail => FAILURE,
    };
    spec.returns(Term::u32(sentinel))?;

    spec.finish()
}

/// The full suite: seven contract instances in fixed submission order.
pub fn suite(layout: &LayoutModel) -> Result<Vec<(ContractId, ContractSpec)>, SpecError> {
    let mut contracts = vec![
        (
            ContractId::plain(FN_INIT_DEFAULT_PLAYER),
            init_default_player(layout)?,
        ),
        (
            ContractId::plain(FN_INIT_DEFAULT_SPRITE),
            init_default_sprite(layout)?,
        ),
    ];
    for case in AttackCase::ALL {
        contracts.push((
            ContractId::with_case(FN_RESOLVE_ATTACK, case.label()),
            resolve_attack(layout, case)?,
        ));
    }
    for case in StatsCase::ALL {
        contracts.push((
            ContractId::with_case(FN_CHECK_STATS, case.label()),
            check_stats(layout, case)?,
        ));
    }
    Ok(contracts)
}
