//! 演示数据生成
//!
//! id 形如 `Location-N` / `Bridge-N` / `Camera-N`（从 1 开始）。
//! 每个 Location 下 `bridges_per_location` 个 Bridge，每个 Bridge 下 `cameras_per_bridge` 个 Camera，
//! Camera 继承所属 Bridge 的 Location。状态按序号确定：每 10 个中 7 online、2 offline、1 error。

use domain::{Bridge, Camera, EntityStatus, Location};

/// 生成规模。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub locations: usize,
    pub bridges_per_location: usize,
    pub cameras_per_bridge: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            locations: 2,
            bridges_per_location: 2,
            cameras_per_bridge: 50,
        }
    }
}

/// 生成结果。
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub locations: Vec<Location>,
    pub bridges: Vec<Bridge>,
    pub cameras: Vec<Camera>,
}

/// 按序号确定状态（7 与 10 互质，任意连续 10 个序号恰好覆盖 0..10）。
pub fn status_for(index: usize) -> EntityStatus {
    match (index * 7) % 10 {
        0..=6 => EntityStatus::Online,
        7 | 8 => EntityStatus::Offline,
        _ => EntityStatus::Error,
    }
}

pub fn generate_locations(count: usize) -> Vec<Location> {
    (1..=count)
        .map(|index| Location {
            id: format!("Location-{}", index),
        })
        .collect()
}

pub fn generate_bridges(locations: &[Location], bridges_per_location: usize) -> Vec<Bridge> {
    let mut bridges = Vec::with_capacity(locations.len() * bridges_per_location);
    for location in locations {
        for _ in 0..bridges_per_location {
            let index = bridges.len();
            bridges.push(Bridge {
                id: format!("Bridge-{}", index + 1),
                location_id: location.id.clone(),
                status: status_for(index),
            });
        }
    }
    bridges
}

pub fn generate_cameras(bridges: &[Bridge], cameras_per_bridge: usize) -> Vec<Camera> {
    let mut cameras = Vec::with_capacity(bridges.len() * cameras_per_bridge);
    for bridge in bridges {
        for _ in 0..cameras_per_bridge {
            let index = cameras.len();
            cameras.push(Camera {
                id: format!("Camera-{}", index + 1),
                location_id: bridge.location_id.clone(),
                bridge_id: bridge.id.clone(),
                status: status_for(index),
            });
        }
    }
    cameras
}

pub fn generate(config: SeedConfig) -> SeedData {
    let locations = generate_locations(config.locations);
    let bridges = generate_bridges(&locations, config.bridges_per_location);
    let cameras = generate_cameras(&bridges, config.cameras_per_bridge);
    SeedData {
        locations,
        bridges,
        cameras,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_distributes_children() {
        let data = generate(SeedConfig {
            locations: 2,
            bridges_per_location: 3,
            cameras_per_bridge: 4,
        });
        assert_eq!(data.locations.len(), 2);
        assert_eq!(data.bridges.len(), 6);
        assert_eq!(data.cameras.len(), 24);
        assert_eq!(data.bridges[3].location_id, "Location-2");
        let camera = &data.cameras[5];
        assert_eq!(camera.id, "Camera-6");
        assert_eq!(camera.bridge_id, "Bridge-2");
        assert_eq!(camera.location_id, "Location-1");
    }

    #[test]
    fn status_distribution_is_seventy_twenty_ten() {
        let statuses: Vec<_> = (0..100).map(status_for).collect();
        let count = |status| statuses.iter().filter(|item| **item == status).count();
        assert_eq!(count(EntityStatus::Online), 70);
        assert_eq!(count(EntityStatus::Offline), 20);
        assert_eq!(count(EntityStatus::Error), 10);
    }
}
