use proptest::prelude::*;

use panel_wm::layout::{Point, Size, Viewport};
use panel_wm::window::{MagneticSnap, WindowConfig, WindowEdge, WindowRegistry};

fn edge_from(index: u8) -> WindowEdge {
    match index % 4 {
        0 => WindowEdge::Left,
        1 => WindowEdge::Right,
        2 => WindowEdge::Top,
        _ => WindowEdge::Bottom,
    }
}

fn screen_snap(bits: u8) -> MagneticSnap {
    MagneticSnap {
        left: bits & 0b0001 != 0,
        right: bits & 0b0010 != 0,
        top: bits & 0b0100 != 0,
        bottom: bits & 0b1000 != 0,
        window: None,
    }
}

#[derive(Debug, Clone)]
struct WindowSpec {
    position: (i32, i32),
    size: (u32, u32),
    /// Attach to an earlier window (by index modulo the count so far).
    attach: Option<(usize, u8)>,
    screen: u8,
}

fn window_spec() -> impl Strategy<Value = WindowSpec> {
    (
        (-50i32..500, -50i32..400),
        (6u32..200, 3u32..120),
        proptest::option::of((any::<usize>(), any::<u8>())),
        0u8..16,
    )
        .prop_map(|(position, size, attach, screen)| WindowSpec {
            position,
            size,
            attach,
            screen,
        })
}

fn build(specs: &[WindowSpec], viewport: Viewport) -> WindowRegistry<()> {
    let mut wm = WindowRegistry::in_memory(viewport);
    for (idx, spec) in specs.iter().enumerate() {
        let id = format!("w{idx}");
        wm.open(
            WindowConfig::new(id.as_str(), ())
                .with_position(spec.position.0, spec.position.1)
                .with_size(spec.size.0, spec.size.1),
        );
        let snap = match spec.attach {
            Some((target, edge)) if idx > 0 => {
                MagneticSnap::attached_to(format!("w{}", target % idx), edge_from(edge))
            }
            _ => screen_snap(spec.screen),
        };
        wm.update_magnetic_snap(&id, snap);
    }
    wm
}

fn assert_inside(wm: &WindowRegistry<()>) -> Result<(), TestCaseError> {
    let viewport = wm.viewport();
    for window in wm.iter() {
        let max_x = viewport.width.saturating_sub(window.size.width) as i32;
        let max_y = viewport.height.saturating_sub(window.size.height) as i32;
        prop_assert!(window.position.x >= 0 && window.position.x <= max_x);
        prop_assert!(window.position.y >= 0 && window.position.y <= max_y);
    }
    Ok(())
}

proptest! {
    #[test]
    fn windows_stay_inside_the_viewport(
        specs in prop::collection::vec(window_spec(), 1..8),
        moves in prop::collection::vec((-300i32..2000, -300i32..1500), 0..8),
        width in 40u32..400,
        height in 20u32..300,
    ) {
        let mut wm = build(&specs, Viewport::new(800, 600));
        assert_inside(&wm)?;
        for (idx, (x, y)) in moves.into_iter().enumerate() {
            let id = format!("w{}", idx % specs.len());
            wm.update_position(&id, Point::new(x, y));
            assert_inside(&wm)?;
        }
        wm.resize_viewport(Viewport::new(width, height));
        assert_inside(&wm)?;
    }

    #[test]
    fn relaxation_reaches_a_fixed_point_in_one_pass(
        specs in prop::collection::vec(window_spec(), 1..8),
        width in 40u32..1200,
        height in 20u32..900,
    ) {
        let mut wm = build(&specs, Viewport::new(800, 600));
        wm.resize_viewport(Viewport::new(width, height));
        wm.relax();
        let first: Vec<Point> = wm.iter().map(|w| w.position).collect();
        prop_assert!(wm.relax().is_empty());
        let second: Vec<Point> = wm.iter().map(|w| w.position).collect();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn shrinking_the_viewport_keeps_a_snapped_chain_together() {
    let mut wm = WindowRegistry::in_memory(Viewport::new(1920, 1080));
    wm.open(WindowConfig::new("a", ()).with_position(1400, 100).with_size(200, 100));
    wm.open(WindowConfig::new("b", ()).with_position(1600, 100).with_size(200, 100));
    wm.open(WindowConfig::new("c", ()).with_position(1600, 200).with_size(200, 100));
    wm.update_magnetic_snap("b", MagneticSnap::attached_to("a", WindowEdge::Right));
    wm.update_magnetic_snap("c", MagneticSnap::attached_to("b", WindowEdge::Bottom));

    let changed = wm.resize_viewport(Viewport::new(1000, 700));
    assert_eq!(changed, vec!["a", "b", "c"]);
    let a = wm.get("a").unwrap();
    let b = wm.get("b").unwrap();
    let c = wm.get("c").unwrap();
    assert_eq!(a.position, Point::new(800, 100));
    // b would sit at a.right = 1000, past the edge; clamping wins
    assert_eq!(b.position, Point::new(800, 100));
    assert_eq!(c.position, Point::new(800, 200));
    assert_eq!(c.size, Size::new(200, 100));
    assert!(wm.relax().is_empty());
}

#[test]
fn right_snapped_window_follows_the_right_edge() {
    let mut wm = WindowRegistry::in_memory(Viewport::new(1920, 1080));
    wm.open(WindowConfig::new("chat", ()).with_position(1520, 500).with_size(400, 300));
    wm.update_magnetic_snap(
        "chat",
        MagneticSnap {
            right: true,
            ..MagneticSnap::default()
        },
    );
    wm.resize_viewport(Viewport::new(2560, 1440));
    assert_eq!(wm.get("chat").unwrap().position, Point::new(2160, 500));
}
