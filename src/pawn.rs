use crate::scene::SceneNodeId;
use bevy_ecs::prelude::Component;
use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
use std::f32::consts::FRAC_PI_2;

pub const PLAYER_MOVE_SPEED: f32 = 5.0;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntentFlags: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const TURNING = 1 << 4;
    }
}

/// Per-tick movement intent. Whoever steers the pawn (input collaborator
/// for the player, the AI for enemies) raises flags; the level consumes
/// and clears them when it resolves movement.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveIntent {
    pub flags: IntentFlags,
    pub turn_amount: f32,
}

impl Default for MoveIntent {
    fn default() -> Self {
        Self { flags: IntentFlags::empty(), turn_amount: 0.0 }
    }
}

impl MoveIntent {
    pub fn move_forward(&mut self) {
        self.flags |= IntentFlags::FORWARD;
    }

    pub fn move_backward(&mut self) {
        self.flags |= IntentFlags::BACKWARD;
    }

    pub fn move_left(&mut self) {
        self.flags |= IntentFlags::LEFT;
    }

    pub fn move_right(&mut self) {
        self.flags |= IntentFlags::RIGHT;
    }

    pub fn turn(&mut self, amount: f32) {
        self.flags |= IntentFlags::TURNING;
        self.turn_amount = amount;
    }

    pub fn clear(&mut self) {
        *self = MoveIntent::default();
    }
}

/// Position comes from the physics body after every step; rotation is the
/// facing angle, which the body never owns (rotation is locked there).
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub translation: Vec2,
    pub rotation: f32,
}

impl Transform {
    pub fn at(translation: Vec2) -> Self {
        Self { translation, rotation: 0.0 }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MoveSpeed(pub f32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    MaskedSamurai,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PawnKind {
    Player,
    Enemy(EnemyKind),
}

impl PawnKind {
    pub fn is_player(self) -> bool {
        self == PawnKind::Player
    }

    pub fn is_enemy(self) -> bool {
        matches!(self, PawnKind::Enemy(_))
    }
}

/// Physics binding, attached when the pawn first materializes.
#[derive(Component, Debug, Clone, Copy)]
pub struct PawnBody {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct SceneProxy(pub SceneNodeId);

/// Billboard sprite node for pawns that have one (the player does not).
#[derive(Component, Debug, Clone, Copy)]
pub struct SpriteNode(pub SceneNodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Walking,
    Attacking,
    Dead,
}

/// Behaviour-tuning data per enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    pub speed: f32,
    pub aggroed_speed: f32,
    pub health: f32,
    pub armor: f32,
    pub aggro_radius: f32,
    pub attack_range: f32,
    pub idle_state_time: f32,
    pub walk_state_time: f32,
    pub attack_state_time: f32,
    pub sprite_texture: &'static str,
}

impl EnemyKind {
    pub fn tuning(self) -> EnemyTuning {
        match self {
            EnemyKind::MaskedSamurai => EnemyTuning {
                speed: 1.0,
                aggroed_speed: 3.0,
                health: 30.0,
                armor: 0.0,
                aggro_radius: 10.0,
                attack_range: 5.0,
                idle_state_time: 1.0,
                walk_state_time: 1.0,
                attack_state_time: 1.0,
                sprite_texture: "assets/textures/masked_samurai_spritesheet.png",
            },
        }
    }

    pub fn clips(self) -> &'static [AnimationClip] {
        match self {
            EnemyKind::MaskedSamurai => MASKED_SAMURAI_CLIPS,
        }
    }
}

/// Enemy-only state: health, aggro and the behaviour state machine.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyBrain {
    pub kind: EnemyKind,
    pub tuning: EnemyTuning,
    pub state: EnemyState,
    pub state_time: f32,
    pub aggroed: bool,
    pub health: f32,
    pub armor: f32,
}

impl EnemyBrain {
    pub fn new(kind: EnemyKind) -> Self {
        let tuning = kind.tuning();
        Self {
            kind,
            tuning,
            state: EnemyState::Idle,
            state_time: 0.0,
            aggroed: false,
            health: tuning.health,
            armor: tuning.armor,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead || self.health <= 0.0
    }
}

/// One named frame sequence inside a pawn's sprite sheet.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClip {
    pub name: &'static str,
    pub frames: &'static [usize],
    pub fps: f32,
    pub looped: bool,
}

const MASKED_SAMURAI_CLIPS: &[AnimationClip] = &[
    AnimationClip { name: "idle", frames: &[0], fps: 1.0, looped: true },
    AnimationClip { name: "fire", frames: &[1, 2, 3, 2, 1], fps: 5.0, looped: false },
    AnimationClip { name: "die", frames: &[0, 4, 5], fps: 4.0, looped: false },
    AnimationClip { name: "walk", frames: &[0, 6, 0, 7], fps: 4.0, looped: true },
];

/// Frame playback state. The renderer reads `current_frame`; the level
/// drives `advance` once per tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct Animator {
    pub clip: &'static str,
    pub frame_index: usize,
    pub frame_time: f32,
}

impl Animator {
    pub fn new(clip: &'static str) -> Self {
        Self { clip, frame_index: 0, frame_time: 0.0 }
    }

    pub fn set_clip(&mut self, clip: &'static str) {
        self.clip = clip;
        self.frame_index = 0;
        self.frame_time = 0.0;
    }

    pub fn advance(&mut self, dt: f32, clip: &AnimationClip) {
        self.frame_time += dt;
        if self.frame_time < 1.0 / clip.fps {
            return;
        }
        self.frame_time = 0.0;
        self.frame_index += 1;
        if self.frame_index >= clip.frames.len() {
            if clip.looped {
                self.frame_index = 0;
            } else {
                // Non-looping clips hold their last frame.
                self.frame_index = clip.frames.len() - 1;
            }
        }
    }

    pub fn current_frame(&self, clip: &AnimationClip) -> usize {
        clip.frames[self.frame_index.min(clip.frames.len() - 1)]
    }
}

pub fn find_clip(kind: EnemyKind, name: &str) -> Option<&'static AnimationClip> {
    kind.clips().iter().find(|clip| clip.name == name)
}

/// Turns intent flags into a world-space velocity. Forward is along the
/// facing angle; strafe directions are ninety degrees off it. The summed
/// direction is normalized so diagonals are not faster.
pub fn velocity_from_intent(intent: &MoveIntent, rotation: f32, speed: f32) -> Vec2 {
    let mut velocity = Vec2::ZERO;
    if intent.flags.contains(IntentFlags::FORWARD) {
        velocity += Vec2::new(-rotation.sin(), -rotation.cos());
    }
    if intent.flags.contains(IntentFlags::BACKWARD) {
        velocity += Vec2::new(rotation.sin(), rotation.cos());
    }
    if intent.flags.contains(IntentFlags::LEFT) {
        velocity += Vec2::new((rotation - FRAC_PI_2).sin(), (rotation - FRAC_PI_2).cos());
    }
    if intent.flags.contains(IntentFlags::RIGHT) {
        velocity += Vec2::new((rotation + FRAC_PI_2).sin(), (rotation + FRAC_PI_2).cos());
    }
    velocity.normalize_or_zero() * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_intent_moves_along_facing() {
        let mut intent = MoveIntent::default();
        intent.move_forward();
        let velocity = velocity_from_intent(&intent, 0.0, 5.0);
        assert!((velocity - Vec2::new(0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn diagonal_intent_is_normalized() {
        let mut intent = MoveIntent::default();
        intent.move_forward();
        intent.move_right();
        let velocity = velocity_from_intent(&intent, 0.0, 5.0);
        assert!((velocity.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn non_looping_clip_holds_last_frame() {
        let clip = find_clip(EnemyKind::MaskedSamurai, "die").expect("die clip");
        let mut animator = Animator::new("die");
        for _ in 0..20 {
            animator.advance(0.3, clip);
        }
        assert_eq!(animator.current_frame(clip), 5);
    }
}
