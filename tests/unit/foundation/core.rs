use super::*;

fn secs(s: f64) -> MediaTime {
    MediaTime::from_seconds(s, 600).unwrap()
}

#[test]
fn media_time_rejects_zero_timescale() {
    assert!(MediaTime::new(10, 0).is_err());
    assert!(MediaTime::from_seconds(1.0, 0).is_err());
}

#[test]
fn media_time_converts_to_seconds() {
    assert_eq!(MediaTime::new(300, 600).unwrap().seconds(), 0.5);
    assert_eq!(MediaTime::new(-600, 600).unwrap().seconds(), -1.0);
}

#[test]
fn time_range_requires_positive_duration() {
    assert!(TimeRange::new(MediaTime::ZERO, MediaTime::new(0, 600).unwrap()).is_err());
    assert!(TimeRange::new(MediaTime::ZERO, MediaTime::new(-5, 600).unwrap()).is_err());
    assert!(TimeRange::new(MediaTime::ZERO, MediaTime::new(1, 600).unwrap()).is_ok());
}

#[test]
fn tween_is_zero_at_range_start() {
    let range = TimeRange::new(secs(2.0), secs(4.0)).unwrap();
    assert_eq!(tween_factor(secs(2.0), range), 0.0);
}

#[test]
fn tween_is_elapsed_over_duration() {
    let range = TimeRange::new(secs(2.0), secs(4.0)).unwrap();
    assert_eq!(tween_factor(secs(3.0), range), 0.25);
    assert_eq!(tween_factor(secs(6.0), range), 1.0);
}

#[test]
fn tween_is_not_clamped_outside_the_window() {
    let range = TimeRange::new(secs(2.0), secs(4.0)).unwrap();
    assert_eq!(tween_factor(secs(0.0), range), -0.5);
    assert_eq!(tween_factor(secs(10.0), range), 2.0);
}

#[test]
fn invalid_track_id_is_not_valid() {
    assert!(!TrackId::INVALID.is_valid());
    assert!(TrackId(3).is_valid());
}

#[test]
fn bgra8_color_channel_order() {
    let c = Color {
        r: 1,
        g: 2,
        b: 3,
        a: 4,
    };
    assert_eq!(c.to_bgra8(), [3, 2, 1, 4]);
    assert_eq!(PixelFormat::Bgra8.bytes_per_pixel(), 4);
}
