use indexmap::IndexMap;
use meatstack_rs::chart::{BarGeom, Scene, StackedBarChart};
use meatstack_rs::config::ChartConfig;
use meatstack_rs::models::{CountryRecord, StackMode};
use meatstack_rs::transition::{Animator, ease_cubic_in_out, lerp_geom};
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scenes() -> (Scene, Scene) {
    let mk = |code: &str, beef: f64, pork: f64| {
        let mut value = IndexMap::new();
        value.insert("beef".to_string(), beef);
        value.insert("pork".to_string(), pork);
        CountryRecord { code: code.into(), name: code.into(), icon: String::new(), value }
    };
    let c = StackedBarChart::new(
        vec![mk("A", 10.0, 5.0), mk("B", 4.0, 4.0), mk("C", 1.0, 1.0)],
        "kg",
        "share",
        ChartConfig::default(),
    )
    .unwrap();
    (
        c.scene(&c.layout_for(StackMode::Stacked)),
        c.scene(&c.layout_for(StackMode::Percentage)),
    )
}

fn assert_at_targets(frame: &[BarGeom], scene: &Scene) {
    assert_eq!(frame.len(), scene.bars.len());
    for (g, bar) in frame.iter().zip(&scene.bars) {
        assert!((g.y - bar.geom.y).abs() < 1e-9);
        assert!((g.height - bar.geom.height).abs() < 1e-9);
        assert!((g.x - bar.geom.x).abs() < 1e-9);
    }
}

#[test]
fn first_target_grows_from_baseline() {
    let (stacked, _) = scenes();
    let mut anim = Animator::new();
    assert_eq!(anim.generation(), 0);
    anim.retarget(&stacked, ms(0));
    assert_eq!(anim.generation(), 1);

    for (g, bar) in anim.frame(ms(0)).iter().zip(&stacked.bars) {
        assert_eq!(g.y, stacked.baseline_y);
        assert_eq!(g.height, 0.0);
        assert_eq!(g.x, bar.geom.x);
    }
    assert!(anim.is_running(ms(0)));
    // last country starts 100ms late and runs 1000ms
    assert!(anim.is_running(ms(1099)));
    assert!(!anim.is_running(ms(1100)));
    assert_at_targets(&anim.frame(ms(1100)), &stacked);
}

#[test]
fn stagger_delays_later_countries() {
    let (stacked, _) = scenes();
    let mut anim = Animator::new();
    anim.retarget(&stacked, ms(0));
    let frame = anim.frame(ms(50));
    // country A has moved, country B has not started yet
    assert!(frame[0].height > 0.0);
    assert_eq!(frame[1].height, 0.0);
}

#[test]
fn retarget_mid_flight_starts_from_current_frame() {
    let (stacked, pct) = scenes();
    let mut anim = Animator::new();
    anim.retarget(&stacked, ms(0));
    let mid = anim.frame(ms(500));

    anim.retarget(&pct, ms(500));
    assert_eq!(anim.generation(), 2);
    assert_eq!(anim.frame(ms(500)), mid);
    assert!(anim.is_running(ms(1500)));
    assert_at_targets(&anim.frame(ms(1700)), &pct);
}

#[test]
fn retarget_to_smaller_scene_drops_extra_bars() {
    let (stacked, _) = scenes();
    let mut small = stacked.clone();
    small.bars.truncate(2);
    let mut anim = Animator::new();
    anim.retarget(&stacked, ms(0));
    anim.retarget(&small, ms(2000));
    assert_eq!(anim.frame(ms(2000)).len(), 2);
}

#[test]
fn easing_is_symmetric() {
    for t in [0.1, 0.2, 0.3, 0.4] {
        let a = ease_cubic_in_out(t);
        let b = ease_cubic_in_out(1.0 - t);
        assert!((a + b - 1.0).abs() < 1e-12);
    }
    let from = BarGeom { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
    let to = BarGeom { x: 10.0, y: 20.0, width: 30.0, height: 40.0 };
    assert_eq!(lerp_geom(&from, &to, 1.0), to);
}
