use vizij_drive_core::{
    Config, Driver, EventLog, FrameGeometry, ManualClock, MotionEvent, Point, Rotation,
};

fn main() -> anyhow::Result<()> {
    // Short trips, otherwise defaults.
    let cfg = Config::from_json(r#"{ "trip_duration_ms": 600 }"#)?;
    let mut driver = Driver::new(cfg, FrameGeometry::new(1080, 2340, Rotation::Deg0));
    let clock = ManualClock::new();
    let log = EventLog::new();

    driver.drive_to(Point::new(900.0, 300.0), log.listener());
    while driver.state().is_running() {
        driver.tick_with(&clock);
        clock.advance_millis(100);
    }

    for event in log.drain() {
        match event {
            MotionEvent::Sampled(s) => println!(
                "t={:.3} ({:7.2}, {:7.2}) heading {:+.3}",
                s.t, s.position.x, s.position.y, s.heading
            ),
            other => println!("{}", serde_json::to_string(&other)?),
        }
    }

    // Rotate the device and keep going from the same spot on screen.
    let pose = driver.frame_changed(FrameGeometry::new(2340, 1080, Rotation::Deg90));
    println!("after rotation: {pose:?}");

    let saved = driver.suspend();
    println!("snapshot: {} bytes", saved.len());
    Ok(())
}
