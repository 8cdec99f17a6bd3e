// src/producer/generator.rs
//
// Demo producer: random rooms joined by corridors, emitted as producer
// commands so it exercises the same path as a real level script.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::config::GeneratorConfig;
use crate::map::{Face, PropertySet};
use crate::producer::commands::{
    BrushInfo, BrushRequest, EntityRequest, HeightSpec, ProducerCommand, PropertyRequest, VertexSpec,
};
use crate::utils::util::clamp;
use crate::utils::BoundingBox;

const MONSTERS: [&str; 4] = ["zombieman", "shotgun_guy", "imp", "demon"];

#[derive(Debug, Clone)]
struct Room {
    bbox: BoundingBox,
    floor: f64,
    ceiling: f64,
}

impl Room {
    fn center(&self) -> (f64, f64) {
        (
            (self.bbox.min_x + self.bbox.max_x) * 0.5,
            (self.bbox.min_y + self.bbox.max_y) * 0.5,
        )
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub room_count: usize,
    pub corridor_count: usize,
    pub brush_count: usize,
    pub entity_count: usize,
}

pub struct ProceduralGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    stats: GenerationStats,
}

impl ProceduralGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        ProceduralGenerator {
            config,
            rng,
            stats: GenerationStats::default(),
        }
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// One complete level, from `begin_level` to `end_level`.
    pub fn generate(&mut self) -> Vec<ProducerCommand> {
        self.stats = GenerationStats::default();

        let rooms = self.generate_rooms();
        let links = self.generate_corridors(&rooms);

        let mut cmds = vec![
            ProducerCommand::BeginLevel,
            ProducerCommand::Property(PropertyRequest {
                key: "seed".to_string(),
                value: self.config.seed.to_string(),
            }),
        ];

        for room in &rooms {
            cmds.push(self.room_brush(room));
        }
        for &(a, b) in &links {
            cmds.extend(self.corridor_brushes(&rooms[a], &rooms[b]));
        }
        for (i, room) in rooms.iter().enumerate() {
            cmds.extend(self.room_entities(i, room));
        }

        cmds.push(ProducerCommand::EndLevel);

        self.stats.room_count = rooms.len();
        self.stats.corridor_count = links.len();
        debug!("generator: {:?}", self.stats);

        cmds
    }

    fn generate_rooms(&mut self) -> Vec<Room> {
        let g = self.config.grid.max(1);
        let lo = (self.config.min_room_size / g).max(1);
        let hi = (self.config.max_room_size / g).max(lo);

        (0..self.config.room_count)
            .map(|_| {
                let w = self.rng.random_range(lo..=hi) * g;
                let h = self.rng.random_range(lo..=hi) * g;
                let x = self.rng.random_range(0..=((self.config.width - w) / g).max(0)) * g;
                let y = self.rng.random_range(0..=((self.config.height - h) / g).max(0)) * g;

                let floor = self.rng.random_range(0..4) as f64 * 16.0;
                let ceiling = floor + 128.0 + self.rng.random_range(0..3) as f64 * 32.0;

                Room {
                    bbox: BoundingBox::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64),
                    floor,
                    ceiling,
                }
            })
            .collect()
    }

    /// Spanning tree over room centres, plus a few extra links.
    fn generate_corridors(&mut self, rooms: &[Room]) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for i in 0..rooms.len() {
            for j in i + 1..rooms.len() {
                edges.push((room_distance(&rooms[i], &rooms[j]), i, j));
            }
        }
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut connections = QuickUnionUf::<UnionBySize>::new(rooms.len());
        let mut links = Vec::new();
        let mut extra = Vec::new();

        for &(_, i, j) in &edges {
            // union is false when both rooms are already connected
            if connections.union(i, j) {
                links.push((i, j));
            } else {
                extra.push((i, j));
            }
        }

        for link in extra {
            if self.rng.random_bool(clamp(self.config.branching_factor, 0.0, 1.0)) {
                links.push(link);
            }
        }

        links
    }

    fn room_brush(&mut self, room: &Room) -> ProducerCommand {
        self.stats.brush_count += 1;
        box_brush(
            &room.bbox,
            room.floor,
            room.ceiling,
            BrushInfo {
                w_face: Some(Face::new("STARTAN3")),
                b_face: Some(Face::new("FLOOR4_8")),
                t_face: Some(Face::new("CEIL3_5")),
                ..BrushInfo::default()
            },
        )
    }

    /// L-shaped corridor: along x from `a`, then along y into `b`. Rooms
    /// have the lower mark, so they win where a corridor runs through them.
    fn corridor_brushes(&mut self, a: &Room, b: &Room) -> Vec<ProducerCommand> {
        let g = self.config.grid.max(1) as f64;
        let half = (self.config.corridor_width.max(1) as f64) * 0.5;
        let snap = |v: f64| (v / g).round() * g;

        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        let (ax, ay, bx, by) = (snap(ax), snap(ay), snap(bx), snap(by));

        let floor = a.floor.min(b.floor);
        let ceiling = floor + 112.0;
        let info = BrushInfo {
            mark: 1,
            w_face: Some(Face::new("BROWN1")),
            b_face: Some(Face::new("FLAT5")),
            t_face: Some(Face::new("FLAT5")),
            ..BrushInfo::default()
        };

        let legs = [
            BoundingBox::new(ax.min(bx) - half, ay - half, ax.max(bx) + half, ay + half),
            BoundingBox::new(bx - half, ay.min(by) - half, bx + half, ay.max(by) + half),
        ];

        self.stats.brush_count += legs.len();
        legs.iter()
            .map(|leg| box_brush(leg, floor, ceiling, info.clone()))
            .collect()
    }

    fn room_entities(&mut self, index: usize, room: &Room) -> Vec<ProducerCommand> {
        let (cx, cy) = room.center();
        let w = room.bbox.max_x - room.bbox.min_x;
        let h = room.bbox.max_y - room.bbox.min_y;

        let mut spawns = Vec::new();
        if index == 0 {
            spawns.push(("player1", cx, cy));
        } else {
            for _ in 0..self.config.monsters_per_room {
                let name = MONSTERS[self.rng.random_range(0..MONSTERS.len())];
                let x = cx + self.rng.random_range(-0.4..0.4) * w;
                let y = cy + self.rng.random_range(-0.4..0.4) * h;
                spawns.push((name, x.round(), y.round()));
            }
        }

        spawns
            .into_iter()
            .map(|(name, x, y)| {
                let mut props = PropertySet::new();
                props.add("angle", &(self.rng.random_range(0..8) * 45).to_string());
                self.stats.entity_count += 1;

                ProducerCommand::AddEntity(EntityRequest {
                    name: name.to_string(),
                    x,
                    y,
                    z: room.floor,
                    props,
                    args: None,
                })
            })
            .collect()
    }
}

fn room_distance(a: &Room, b: &Room) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by)
}

fn box_brush(bbox: &BoundingBox, z1: f64, z2: f64, info: BrushInfo) -> ProducerCommand {
    ProducerCommand::AddBrush(BrushRequest {
        info,
        verts: vec![
            VertexSpec::new(bbox.min_x, bbox.min_y),
            VertexSpec::new(bbox.max_x, bbox.min_y),
            VertexSpec::new(bbox.max_x, bbox.max_y),
            VertexSpec::new(bbox.min_x, bbox.max_y),
        ],
        z1: HeightSpec::Flat(z1),
        z2: HeightSpec::Flat(z2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinimapConfig;
    use crate::producer::driver::{LevelDriver, SummaryExporter};

    #[test]
    fn test_same_seed_same_level() {
        let config = GeneratorConfig::default();
        let first = ProceduralGenerator::new(config.clone()).generate();
        let second = ProceduralGenerator::new(config).generate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_brushes_are_valid() {
        let config = GeneratorConfig {
            seed: 77,
            room_count: 12,
            ..GeneratorConfig::default()
        };
        let mut generator = ProceduralGenerator::new(config);
        let cmds = generator.generate();

        let brushes: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                ProducerCommand::AddBrush(req) => Some(req.to_brush().unwrap()),
                _ => None,
            })
            .collect();

        assert_eq!(brushes.len(), generator.stats().brush_count);
        assert_eq!(generator.stats().room_count, 12);
        assert!(generator.stats().corridor_count >= 11);
        for brush in &brushes {
            assert!(brush.validate().is_ok());
        }
    }

    #[test]
    fn test_corridors_form_a_spanning_tree() {
        let config = GeneratorConfig {
            seed: 9,
            room_count: 10,
            branching_factor: 0.0,
            ..GeneratorConfig::default()
        };
        let mut generator = ProceduralGenerator::new(config);
        let rooms = generator.generate_rooms();
        let links = generator.generate_corridors(&rooms);

        // no extra links: exactly n - 1 and every room reachable from room 0
        assert_eq!(links.len(), rooms.len() - 1);
        let mut reached = vec![false; rooms.len()];
        reached[0] = true;
        let mut changed = true;
        while changed {
            changed = false;
            for &(a, b) in &links {
                if reached[a] != reached[b] {
                    reached[a] = true;
                    reached[b] = true;
                    changed = true;
                }
            }
        }
        assert!(reached.iter().all(|&r| r));
    }

    #[test]
    fn test_full_branching_links_every_pair() {
        let config = GeneratorConfig {
            room_count: 5,
            branching_factor: 1.0,
            ..GeneratorConfig::default()
        };
        let mut generator = ProceduralGenerator::new(config);
        let rooms = generator.generate_rooms();
        assert_eq!(generator.generate_corridors(&rooms).len(), 10);
    }

    #[test]
    fn test_generated_level_merges() {
        let mut generator = ProceduralGenerator::new(GeneratorConfig::default());
        let cmds = generator.generate();

        let mut driver = LevelDriver::new(SummaryExporter::with_minimap(MinimapConfig::default()));
        driver.run_all(&cmds).unwrap();

        let exporter = driver.into_exporter();
        assert_eq!(exporter.levels.len(), 1);

        let level = &exporter.levels[0];
        assert_eq!(level.brushes, generator.stats().brush_count);
        assert_eq!(level.entities, generator.stats().entity_count);
        assert!(level.stats.regions > 0);
        assert!(level.stats.two_sided > 0);
        assert!(level.minimap_lines > 0);
        assert_eq!(exporter.properties.get_str("seed"), Some("1"));
    }
}
