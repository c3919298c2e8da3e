//! Scene
//!
//! The level's sprites grouped into named layers. Each layer keeps its
//! sprites in a sparse slot array, so removing a sprite (a collected coin)
//! leaves a hole and can never happen twice. Layers configured for it also
//! keep a spatial hash for overlap queries.

use macroquad::math::Vec2;

use crate::config::LayerConfig;
use crate::physics::{Aabb, SpatialHash, StaticGeometry};
use crate::world::{LayerName, Level};

pub struct SpriteLayer {
    name: LayerName,
    /// Sparse array indexed by sprite id
    sprites: Vec<Option<Aabb>>,
    index: Option<SpatialHash>,
}

impl SpriteLayer {
    pub fn new(name: LayerName, boxes: Vec<Aabb>, use_spatial_hash: bool, cell_size: f32) -> Self {
        let index = use_spatial_hash.then(|| {
            let mut hash = SpatialHash::new(cell_size);
            for (id, aabb) in boxes.iter().enumerate() {
                hash.insert(id, aabb);
            }
            hash
        });
        Self {
            name,
            sprites: boxes.into_iter().map(Some).collect(),
            index,
        }
    }

    pub fn name(&self) -> LayerName {
        self.name
    }

    pub fn get(&self, id: usize) -> Option<&Aabb> {
        self.sprites.get(id).and_then(|slot| slot.as_ref())
    }

    /// Live sprites
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Aabb)> {
        self.sprites
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|aabb| (id, aabb)))
    }

    pub fn len(&self) -> usize {
        self.sprites.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_spatial_hash(&self) -> bool {
        self.index.is_some()
    }

    /// Ids of live sprites overlapping `area`, ascending
    pub fn overlapping(&self, area: &Aabb) -> Vec<usize> {
        match &self.index {
            Some(hash) => hash
                .query(area)
                .into_iter()
                .filter(|&id| self.get(id).is_some_and(|s| s.overlaps(area)))
                .collect(),
            None => self
                .iter()
                .filter(|(_, s)| s.overlaps(area))
                .map(|(id, _)| id)
                .collect(),
        }
    }

    /// Remove a sprite. Returns it only the first time.
    pub fn remove(&mut self, id: usize) -> Option<Aabb> {
        self.sprites.get_mut(id).and_then(|slot| slot.take())
    }
}

pub struct Scene {
    /// One layer per `LayerName`, in draw order
    layers: Vec<SpriteLayer>,
    map_size: Vec2,
    walls: StaticGeometry,
}

impl Scene {
    pub fn from_level(level: &Level, config: &LayerConfig) -> Self {
        let tiles = level.tiles();
        let layers: Vec<SpriteLayer> = LayerName::DRAW_ORDER
            .iter()
            .map(|&name| {
                let boxes = tiles
                    .iter()
                    .filter(|t| t.layer == name)
                    .map(|t| Aabb::new(t.center, t.size))
                    .collect();
                SpriteLayer::new(name, boxes, config.uses_spatial_hash(name), level.tile_size)
            })
            .collect();

        let solid: Vec<Aabb> = tiles
            .iter()
            .filter(|t| t.layer.is_solid())
            .map(|t| Aabb::new(t.center, t.size))
            .collect();
        let hash_walls = config.uses_spatial_hash(LayerName::Platforms)
            || config.uses_spatial_hash(LayerName::Boxes);
        let walls = StaticGeometry::new(solid, hash_walls, level.tile_size);

        Self {
            layers,
            map_size: level.map_size(),
            walls,
        }
    }

    pub fn layer(&self, name: LayerName) -> &SpriteLayer {
        &self.layers[name.index()]
    }

    /// Layers back to front
    pub fn layers(&self) -> impl Iterator<Item = &SpriteLayer> {
        self.layers.iter()
    }

    /// Walls for the physics engines (platforms and boxes)
    pub fn walls(&self) -> &StaticGeometry {
        &self.walls
    }

    pub fn map_size(&self) -> Vec2 {
        self.map_size
    }

    pub fn coins_left(&self) -> usize {
        self.layer(LayerName::Items).len()
    }

    /// Remove every coin overlapping `area` and return their positions
    pub fn collect_coins(&mut self, area: &Aabb) -> Vec<Vec2> {
        let items = &mut self.layers[LayerName::Items.index()];
        items
            .overlapping(area)
            .into_iter()
            .filter_map(|id| items.remove(id))
            .map(|coin| coin.center)
            .collect()
    }

    pub fn touches_death(&self, area: &Aabb) -> bool {
        !self.layer(LayerName::Death).overlapping(area).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn level() -> Level {
        Level {
            name: "scene".to_string(),
            tile_size: 64.0,
            player_start: None,
            rows: vec![
                "~.....".to_string(),
                "P.oo^.".to_string(),
                "##B###".to_string(),
            ],
        }
    }

    #[test]
    fn test_layers_from_level() {
        let scene = Scene::from_level(&level(), &LayerConfig::default());
        assert_eq!(scene.layer(LayerName::Platforms).len(), 5);
        assert_eq!(scene.layer(LayerName::Boxes).len(), 1);
        assert_eq!(scene.layer(LayerName::Background).len(), 1);
        assert_eq!(scene.walls().len(), 6);
        assert_eq!(scene.coins_left(), 2);
        assert!(scene.layer(LayerName::Items).has_spatial_hash());
        assert!(!scene.layer(LayerName::Death).has_spatial_hash());
        assert_eq!(scene.map_size(), vec2(384.0, 192.0));
    }

    #[test]
    fn test_coin_removed_once() {
        let mut scene = Scene::from_level(&level(), &LayerConfig::default());
        // Over the first coin at (160, 96)
        let player = Aabb::new(vec2(150.0, 112.0), vec2(48.0, 96.0));

        let first = scene.collect_coins(&player);
        assert_eq!(first, vec![vec2(160.0, 96.0)]);
        assert!(scene.collect_coins(&player).is_empty());
        assert_eq!(scene.coins_left(), 1);
    }

    #[test]
    fn test_overlap_without_spatial_hash() {
        let config = LayerConfig { spatial_hash: Vec::new() };
        let mut scene = Scene::from_level(&level(), &config);
        let both = Aabb::new(vec2(192.0, 96.0), vec2(64.0, 32.0));
        assert_eq!(scene.collect_coins(&both).len(), 2);
        assert_eq!(scene.coins_left(), 0);
    }

    #[test]
    fn test_death_overlap() {
        let scene = Scene::from_level(&level(), &LayerConfig::default());
        let on_spikes = Aabb::new(vec2(288.0, 100.0), vec2(48.0, 96.0));
        let clear = Aabb::new(vec2(32.0, 112.0), vec2(48.0, 96.0));
        assert!(scene.touches_death(&on_spikes));
        assert!(!scene.touches_death(&clear));
    }
}
