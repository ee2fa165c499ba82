use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use game_core::{
    AreaId, CastProfile, Exit, ExitKind, Key, KeyBindings, Monster, MouseButton, NpcId,
    PlayerState, Position, ResourceMeter, ScreenPoint, SkillId, UnitId,
};
use rand::Rng;

/// Custom line-of-sight predicate replacing the wall raycast.
pub type SightRule = Arc<dyn Fn(Position, Position) -> bool + Send + Sync>;

/// Everything the engine did to the world, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Click {
        button: MouseButton,
        at: ScreenPoint,
    },
    KeyDown(Key),
    KeyUp(Key),
    Press(Key),
    PathStep {
        to: Position,
    },
    Nudge,
    Pickup {
        radius: i32,
    },
    Interact {
        to: AreaId,
    },
}

pub(crate) struct World {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) walls: HashSet<Position>,
    pub(crate) player: PlayerState,
    pub(crate) monsters: Vec<Monster>,
    pub(crate) invulnerable: HashSet<UnitId>,
    /// Monsters that close back in after every player step.
    pub(crate) chasers: HashSet<UnitId>,
    pub(crate) damage_per_hit: u32,
    pub(crate) bindings: KeyBindings,
    pub(crate) teleport: bool,
    pub(crate) walk_tiles: usize,
    pub(crate) teleport_tiles: usize,
    pub(crate) frozen: bool,
    pub(crate) sight: Option<SightRule>,
    /// Exits keyed by the area they lead out of.
    pub(crate) exits: HashMap<AreaId, Vec<Exit>>,
    pub(crate) loaded_area: AreaId,
    /// Number of `loaded_area` reads still answered with the stale area.
    pub(crate) sync_lag: u32,
    pub(crate) sync_lag_after_transition: u32,
    pub(crate) entrance_range: i32,
    pub(crate) failing_interactions: u32,
    pub(crate) steps_until_death: Option<u32>,
    pub(crate) die_on_interaction: bool,
    pub(crate) events: Vec<InputEvent>,
}

impl World {
    pub(crate) fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    pub(crate) fn is_walkable(&self, position: Position) -> bool {
        self.in_bounds(position) && !self.walls.contains(&position)
    }

    pub(crate) fn record(&mut self, event: InputEvent) {
        tracing::trace!("sandbox input: {:?}", event);
        self.events.push(event);
    }

    pub(crate) fn line_of_sight(&self, from: Position, to: Position) -> bool {
        if let Some(rule) = &self.sight {
            return rule(from, to);
        }
        bresenham(from, to)
            .into_iter()
            .filter(|point| *point != from && *point != to)
            .all(|point| !self.walls.contains(&point))
    }

    /// Moves the player onto `position`, taking walk-through exits and
    /// counting down a pending scripted death.
    pub(crate) fn place_player(&mut self, position: Position) {
        self.player.position = position;
        let crossed = self
            .exits
            .get(&self.player.area)
            .and_then(|exits| {
                exits
                    .iter()
                    .find(|exit| exit.kind == ExitKind::Walkable && exit.position == position)
            })
            .map(|exit| exit.to);
        if let Some(area) = crossed {
            self.enter_area(area);
        }
    }

    pub(crate) fn count_step(&mut self) {
        if let Some(remaining) = self.steps_until_death.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.player.life.current = 0;
                self.steps_until_death = None;
            }
        }
    }

    /// Moves every living chaser to a free tile two steps from the player.
    pub(crate) fn pull_chasers(&mut self) {
        let player = self.player.position;
        let spots = [(2, 0), (-2, 0), (0, 2), (0, -2)].map(|(dx, dy)| player.offset(dx, dy));
        for index in 0..self.monsters.len() {
            let monster = &self.monsters[index];
            if !monster.is_alive() || !self.chasers.contains(&monster.id) {
                continue;
            }
            if let Some(spot) = spots.iter().copied().find(|spot| self.is_walkable(*spot)) {
                self.monsters[index].position = spot;
            }
        }
    }

    pub(crate) fn enter_area(&mut self, area: AreaId) {
        tracing::debug!("sandbox transition {} -> {}", self.player.area, area);
        self.player.area = area;
        self.sync_lag = self.sync_lag_after_transition;
        if self.sync_lag == 0 {
            self.loaded_area = area;
        }
    }

    pub(crate) fn hit(&mut self, at: Position) {
        let damage = self.damage_per_hit;
        let invulnerable = &self.invulnerable;
        if let Some(monster) = self
            .monsters
            .iter_mut()
            .find(|monster| monster.position == at && monster.is_alive())
        {
            if !invulnerable.contains(&monster.id) {
                monster.life.current = monster.life.current.saturating_sub(damage);
            }
        }
    }
}

/// Tiles on the segment between `from` and `to`, both ends included.
pub(crate) fn bresenham(from: Position, to: Position) -> Vec<Position> {
    let (mut x, mut y) = (from.x, from.y);
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut points = Vec::new();
    loop {
        points.push(Position::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Shared handle over a sandbox world. Clones observe the same state.
#[derive(Clone)]
pub struct SandboxWorld {
    inner: Arc<Mutex<World>>,
}

impl SandboxWorld {
    /// Open `width` × `height` field with the player in the middle of it.
    pub fn new(width: i32, height: i32) -> Self {
        let bindings = KeyBindings {
            stand_still: Key::SHIFT,
            skills: Default::default(),
        }
        .with_skill(SkillId::ATTACK, Key(0x70))
        .with_skill(SkillId::TELEPORT, Key(0x71))
        .with_skill(SkillId::VIGOR, Key(0x72))
        .with_skill(SkillId::BLIZZARD, Key(0x73))
        .with_skill(SkillId::CONCENTRATION, Key(0x74))
        .with_skill(SkillId::BLESSED_HAMMER, Key(0x75));

        let player = PlayerState {
            position: Position::new(width / 2, height / 2),
            area: AreaId::BLOOD_MOOR,
            life: ResourceMeter::full(100),
            mana: ResourceMeter::full(100),
            left_skill: SkillId::ATTACK,
            right_skill: SkillId::ATTACK,
            skills: [(SkillId::ATTACK, 1)].into_iter().collect(),
            cast: CastProfile::default(),
        };

        let world = World {
            width,
            height,
            walls: HashSet::new(),
            player,
            monsters: Vec::new(),
            invulnerable: HashSet::new(),
            chasers: HashSet::new(),
            damage_per_hit: 10,
            bindings,
            teleport: false,
            walk_tiles: 4,
            teleport_tiles: 10,
            frozen: false,
            sight: None,
            exits: HashMap::new(),
            loaded_area: AreaId::BLOOD_MOOR,
            sync_lag: 0,
            sync_lag_after_transition: 0,
            entrance_range: 5,
            failing_interactions: 0,
            steps_until_death: None,
            die_on_interaction: false,
            events: Vec::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    pub(crate) fn world(&self) -> MutexGuard<'_, World> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    pub fn place_player(&self, position: Position) {
        self.world().player.position = position;
    }

    pub fn set_area(&self, area: AreaId) {
        let mut world = self.world();
        world.player.area = area;
        world.loaded_area = area;
        world.sync_lag = 0;
    }

    pub fn learn_skill(&self, skill: SkillId, level: u8) {
        self.world().player.skills.insert(skill, level);
    }

    pub fn set_cast_profile(&self, cast: CastProfile) {
        self.world().player.cast = cast;
    }

    /// Enables teleport locomotion and teaches the skill.
    pub fn enable_teleport(&self) {
        let mut world = self.world();
        world.teleport = true;
        world.player.skills.insert(SkillId::TELEPORT, 1);
    }

    pub fn add_wall(&self, position: Position) {
        self.world().walls.insert(position);
    }

    pub fn add_walls(&self, positions: impl IntoIterator<Item = Position>) {
        self.world().walls.extend(positions);
    }

    pub fn spawn(&self, monster: Monster) {
        self.world().monsters.push(monster);
    }

    /// Monsters of `npc` with `life` at random walkable tiles within `radius`
    /// of `around`.
    pub fn populate(
        &self,
        rng: &mut impl Rng,
        npc: NpcId,
        count: usize,
        around: Position,
        radius: i32,
        life: u32,
    ) {
        let mut world = self.world();
        let mut next_id = world.monsters.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < count * 50 {
            attempts += 1;
            let position = around.offset(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            );
            let occupied = world.monsters.iter().any(|m| m.position == position);
            if !world.is_walkable(position) || occupied || position == world.player.position {
                continue;
            }
            world
                .monsters
                .push(Monster::new(UnitId(next_id), npc, position, life));
            next_id += 1;
            placed += 1;
        }
    }

    pub fn make_invulnerable(&self, id: UnitId) {
        self.world().invulnerable.insert(id);
    }

    pub fn make_chaser(&self, id: UnitId) {
        self.world().chasers.insert(id);
    }

    pub fn set_damage_per_hit(&self, damage: u32) {
        self.world().damage_per_hit = damage;
    }

    pub fn set_walk_tiles(&self, tiles: usize) {
        self.world().walk_tiles = tiles.max(1);
    }

    /// Frozen players ignore every locomotion input.
    pub fn freeze_player(&self, frozen: bool) {
        self.world().frozen = frozen;
    }

    pub fn set_sight_rule(&self, rule: impl Fn(Position, Position) -> bool + Send + Sync + 'static) {
        self.world().sight = Some(Arc::new(rule));
    }

    pub fn add_exit(&self, from: AreaId, exit: Exit) {
        self.world().exits.entry(from).or_default().push(exit);
    }

    /// After every transition, the loaded map data lags for `reads` queries.
    pub fn set_sync_lag(&self, reads: u32) {
        self.world().sync_lag_after_transition = reads;
    }

    /// Next `count` direct entrance interactions fail.
    pub fn fail_next_interactions(&self, count: u32) {
        self.world().failing_interactions = count;
    }

    /// Player dies after the given number of further path steps.
    pub fn kill_player_after_steps(&self, steps: u32) {
        self.world().steps_until_death = Some(steps.max(1));
    }

    /// Player dies during the next direct entrance interaction.
    pub fn kill_player_on_interaction(&self) {
        self.world().die_on_interaction = true;
    }

    /// Map data stays stuck on `loaded` until the next transition.
    pub fn stall_map_data(&self, loaded: AreaId) {
        let mut world = self.world();
        world.loaded_area = loaded;
        world.sync_lag = 0;
    }

    pub fn set_player_life(&self, life: u32) {
        self.world().player.life.current = life;
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn player_position(&self) -> Position {
        self.world().player.position
    }

    pub fn player_area(&self) -> AreaId {
        self.world().player.area
    }

    pub fn monster_life(&self, id: UnitId) -> Option<u32> {
        self.world()
            .monsters
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.life.current)
    }

    pub fn living_monsters(&self) -> usize {
        self.world().monsters.iter().filter(|m| m.is_alive()).count()
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.world().events.clone()
    }

    pub fn clear_events(&self) {
        self.world().events.clear();
    }

    pub fn path_steps(&self) -> Vec<Position> {
        self.world()
            .events
            .iter()
            .filter_map(|event| match event {
                InputEvent::PathStep { to } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<ScreenPoint> {
        self.world()
            .events
            .iter()
            .filter_map(|event| match event {
                InputEvent::Click { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }
}
