mod episode;
mod map;
mod world_state;

pub use episode::EpisodeCache;
pub use map::{Map, ObstacleSet};
pub use world_state::{
    Bullet, Enemy, MapResources, MapState, MapStatus, PlaythroughState, Treasure,
};
