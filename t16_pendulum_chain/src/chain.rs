use bevy::prelude::*;

pub const ROOT_RADIUS: f32 = 20.0;
pub const ROOT_COLOR: Color = Color::RED;

/// One arm of the pendulum. Positions are in screen space (y down).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub position: Vec2,
    pub angle: f32,
    pub angular_speed: f32,
    pub radius: f32,
    pub line_length: f32,
    pub color: Color,
}

impl Segment {
    pub fn root(pivot: Vec2) -> Self {
        Self {
            position: pivot,
            angle: 0.0,
            angular_speed: 0.0,
            radius: ROOT_RADIUS,
            line_length: 0.0,
            color: ROOT_COLOR,
        }
    }

    /// New arm sitting on its parent, with random speed, size and colour.
    pub fn random(parent: Vec2, rng: &mut fastrand::Rng) -> Self {
        Self {
            position: parent,
            angle: 0.0,
            angular_speed: (rng.i32(0..200) - 100) as f32 / 100.0,
            radius: rng.u32(10..30) as f32,
            line_length: rng.u32(50..150) as f32,
            color: Color::rgba_u8(rng.u8(..), rng.u8(..), rng.u8(..), 255),
        }
    }

    /// Where this segment sits given its parent's position and its current angle.
    pub fn anchored_to(&self, parent: Vec2) -> Vec2 {
        parent + Vec2::new(self.angle.cos(), self.angle.sin()) * self.line_length
    }
}

/// Receives the primitives a chain draws.
pub trait ChainCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub thickness: f32,
    pub color: Color,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            thickness: 2.0,
            color: Color::BLACK,
        }
    }
}

/// Ordered pendulum arms. Index 0 is the root and is never removed.
#[derive(Resource, Debug, Clone)]
pub struct Chain {
    segments: Vec<Segment>,
    // bumped whenever a different segment becomes the tail
    tail_id: u64,
}

impl Chain {
    pub fn new(pivot: Vec2) -> Self {
        Self {
            segments: vec![Segment::root(pivot)],
            tail_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn root(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        // never empty, the root is always there
        &self.segments[self.segments.len() - 1]
    }

    /// Changes every time the tail is replaced, even if the length comes back.
    pub fn tail_id(&self) -> u64 {
        self.tail_id
    }

    /// Appends a random segment starting at the current tail position.
    pub fn add_segment(&mut self, rng: &mut fastrand::Rng) -> &Segment {
        let segment = Segment::random(self.tail().position, rng);
        self.push(segment)
    }

    /// Appends `segment` as the new tail. It starts on the old tail and is
    /// swung out to its arm length by the next `update`.
    pub fn push(&mut self, mut segment: Segment) -> &Segment {
        segment.position = self.tail().position;
        self.segments.push(segment);
        self.tail_id += 1;
        self.tail()
    }

    /// Drops the tail. Returns `None` when only the root is left.
    pub fn remove_segment(&mut self) -> Option<Segment> {
        if self.segments.len() == 1 {
            return None;
        }
        self.tail_id += 1;
        self.segments.pop()
    }

    /// Back to a lone root.
    pub fn reset(&mut self) {
        if self.segments.len() > 1 {
            self.tail_id += 1;
        }
        self.segments.truncate(1);
    }

    /// Moves the root and re-places every arm with its current angle.
    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.segments[0].position = pivot;
        self.update(0.0);
    }

    /// Advances every arm by `dt` seconds, parent before child.
    pub fn update(&mut self, dt: f32) {
        let mut parent = self.segments[0].position;
        for segment in self.segments.iter_mut().skip(1) {
            segment.angle += segment.angular_speed * dt;
            segment.position = segment.anchored_to(parent);
            parent = segment.position;
        }
    }

    pub fn render(&self, canvas: &mut impl ChainCanvas, style: LineStyle) {
        let mut parent: Option<Vec2> = None;
        for segment in self.segments.iter() {
            if let Some(from) = parent {
                canvas.draw_line(from, segment.position, style.thickness, style.color);
            }
            canvas.draw_circle(segment.position, segment.radius, segment.color);
            parent = Some(segment.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawList, Shape};

    fn pivot() -> Vec2 {
        Vec2::new(400.0, 300.0)
    }

    fn fixed(line_length: f32, angular_speed: f32, angle: f32) -> Segment {
        Segment {
            position: Vec2::ZERO,
            angle,
            angular_speed,
            radius: 15.0,
            line_length,
            color: Color::BLUE,
        }
    }

    #[test]
    fn length_counts_root_and_added() {
        let mut rng = fastrand::Rng::with_seed(1);
        for n in 0..10 {
            let mut chain = Chain::new(pivot());
            for _ in 0..n {
                chain.add_segment(&mut rng);
            }
            assert_eq!(chain.len(), n + 1);
        }
    }

    #[test]
    fn root_is_never_removed() {
        let mut chain = Chain::new(pivot());
        for _ in 0..5 {
            assert!(chain.remove_segment().is_none());
            assert_eq!(chain.len(), 1);
        }
        assert_eq!(chain.root(), &Segment::root(pivot()));
    }

    #[test]
    fn interleaved_add_remove_keeps_root() {
        let mut rng = fastrand::Rng::with_seed(99);
        let mut chain = Chain::new(pivot());
        let mut expected = 1usize;
        for _ in 0..500 {
            if rng.bool() {
                chain.add_segment(&mut rng);
                expected += 1;
            } else {
                chain.remove_segment();
                expected = expected.saturating_sub(1).max(1);
            }
            assert_eq!(chain.len(), expected);
            assert!(chain.len() >= 1);
            assert_eq!(chain.root().line_length, 0.0);
        }
    }

    #[test]
    fn add_then_remove_scenario() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut chain = Chain::new(pivot());
        for _ in 0..3 {
            chain.add_segment(&mut rng);
        }
        assert_eq!(chain.len(), 4);

        chain.remove_segment();
        chain.remove_segment();
        assert_eq!(chain.len(), 2);

        while chain.remove_segment().is_some() {}
        assert!(chain.remove_segment().is_none());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn random_segment_ranges() {
        let mut rng = fastrand::Rng::with_seed(42);
        let parent = Vec2::new(12.0, 34.0);
        for _ in 0..1000 {
            let s = Segment::random(parent, &mut rng);
            assert!((-1.0..1.0).contains(&s.angular_speed));
            assert!((10.0..30.0).contains(&s.radius));
            assert!((50.0..150.0).contains(&s.line_length));
            assert_eq!(s.color.a(), 1.0);
            assert_eq!(s.angle, 0.0);
            assert_eq!(s.position, parent);
        }
    }

    #[test]
    fn new_segment_starts_on_tail() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut chain = Chain::new(pivot());
        chain.add_segment(&mut rng);
        chain.update(0.7);
        let tail = chain.tail().position;

        let added = chain.add_segment(&mut rng).clone();
        assert_eq!(added.angle, 0.0);
        assert_eq!(added.position, tail);

        chain.update(0.0);
        assert_eq!(chain.tail().position, added.anchored_to(tail));
    }

    #[test]
    fn same_seed_same_chain() {
        let mut a = Chain::new(pivot());
        let mut b = Chain::new(pivot());
        let mut rng_a = fastrand::Rng::with_seed(2024);
        let mut rng_b = fastrand::Rng::with_seed(2024);
        for _ in 0..8 {
            a.add_segment(&mut rng_a);
            b.add_segment(&mut rng_b);
        }
        assert_eq!(a.segments(), b.segments());
    }

    #[test]
    fn update_places_child_from_updated_parent() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut chain = Chain::new(pivot());
        for _ in 0..6 {
            chain.add_segment(&mut rng);
        }

        for dt in [0.016, 0.5, 1.0, 3.25] {
            chain.update(dt);
            let segments = chain.segments();
            assert_eq!(segments[0].position, pivot());
            for pair in segments.windows(2) {
                let (parent, child) = (&pair[0], &pair[1]);
                let expected = Vec2::new(
                    parent.position.x + child.angle.cos() * child.line_length,
                    parent.position.y + child.angle.sin() * child.line_length,
                );
                assert_eq!(child.position, expected);
            }
        }
    }

    #[test]
    fn update_advances_angle_by_speed() {
        let mut chain = Chain::new(pivot());
        chain.push(fixed(80.0, 0.5, 0.25));
        chain.update(2.0);
        assert_eq!(chain.tail().angle, 0.25 + 0.5 * 2.0);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut rng = fastrand::Rng::with_seed(8);
        let mut chain = Chain::new(pivot());
        for _ in 0..4 {
            chain.add_segment(&mut rng);
        }
        chain.update(1.3);
        let before = chain.segments().to_vec();
        chain.update(0.0);
        assert_eq!(chain.segments(), &before[..]);
    }

    #[test]
    fn still_child_lands_to_the_right() {
        let mut chain = Chain::new(pivot());
        chain.push(fixed(100.0, 0.0, 0.0));
        chain.update(1.0);
        assert_eq!(chain.tail().position, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn pivot_moves_whole_chain() {
        let mut chain = Chain::new(pivot());
        chain.push(fixed(100.0, 0.0, 0.0));
        chain.push(fixed(50.0, 0.0, std::f32::consts::FRAC_PI_2));
        chain.set_pivot(Vec2::new(100.0, 100.0));

        assert_eq!(chain.root().position, Vec2::new(100.0, 100.0));
        assert_eq!(chain.segments()[1].position, Vec2::new(200.0, 100.0));
        let tail = chain.tail().position;
        assert!((tail - Vec2::new(200.0, 150.0)).length() < 1e-4);
    }

    #[test]
    fn reset_keeps_only_root() {
        let mut rng = fastrand::Rng::with_seed(6);
        let mut chain = Chain::new(pivot());
        for _ in 0..5 {
            chain.add_segment(&mut rng);
        }
        chain.reset();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.tail(), chain.root());
    }

    #[test]
    fn tail_id_tracks_tail_changes() {
        let mut rng = fastrand::Rng::with_seed(13);
        let mut chain = Chain::new(pivot());
        let root_only = chain.tail_id();

        assert!(chain.remove_segment().is_none());
        chain.reset();
        chain.update(1.0);
        assert_eq!(chain.tail_id(), root_only);

        chain.add_segment(&mut rng);
        chain.add_segment(&mut rng);
        let two = chain.tail_id();
        chain.reset();
        chain.add_segment(&mut rng);
        chain.add_segment(&mut rng);
        assert_eq!(chain.len(), 3);
        assert_ne!(chain.tail_id(), two);
    }

    #[test]
    fn render_root_only_is_one_circle() {
        let chain = Chain::new(pivot());
        let mut list = DrawList::default();
        chain.render(&mut list, LineStyle::default());
        assert_eq!(
            list.shapes,
            vec![Shape::Circle {
                center: pivot(),
                radius: ROOT_RADIUS,
                color: ROOT_COLOR,
            }]
        );
    }

    #[test]
    fn render_links_each_segment_to_parent() {
        let mut rng = fastrand::Rng::with_seed(21);
        let mut chain = Chain::new(pivot());
        for _ in 0..4 {
            chain.add_segment(&mut rng);
        }
        chain.update(0.4);

        let style = LineStyle {
            thickness: 3.0,
            color: Color::GRAY,
        };
        let mut list = DrawList::default();
        chain.render(&mut list, style);

        assert_eq!(list.shapes.len(), chain.len() * 2 - 1);
        let segments = chain.segments();
        for (i, segment) in segments.iter().enumerate().skip(1) {
            assert_eq!(
                list.shapes[2 * i - 1],
                Shape::Line {
                    from: segments[i - 1].position,
                    to: segment.position,
                    thickness: 3.0,
                    color: Color::GRAY,
                }
            );
            assert_eq!(
                list.shapes[2 * i],
                Shape::Circle {
                    center: segment.position,
                    radius: segment.radius,
                    color: segment.color,
                }
            );
        }
    }
}
