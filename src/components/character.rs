/// Marker: this entity is the player (the chased one).
pub struct Player;

/// Marker: this entity is the NPC chaser.
pub struct Chaser;
