//! Integration tests: primitives composed the way soundscape layers use them.

use std::time::Duration;
use tranquil_core::{
    Clock, Lfo, LinearSmoothedParam, ManualClock, Processor, StateVariableFilter, SvfOutput,
    TimerQueue, db_to_linear, octave_ratio,
};

#[test]
fn fade_timer_matches_ramp_length() {
    let sample_rate = 1000.0;
    let clock = ManualClock::new();
    let mut timers = TimerQueue::new();
    let mut gain = LinearSmoothedParam::with_sample_rate(0.0, sample_rate);

    let fade = 2.0;
    gain.ramp_to(db_to_linear(-40.0), fade);
    timers.schedule(clock.now() + Duration::from_secs_f32(fade), "faded in");

    for _ in 0..1999 {
        gain.advance();
    }
    clock.advance(Duration::from_millis(1999));
    assert!(timers.pop_due(clock.now()).is_none());
    assert!(!gain.is_settled());

    gain.advance();
    clock.advance(Duration::from_millis(1));
    assert_eq!(timers.pop_due(clock.now()).map(|(_, e)| e), Some("faded in"));
    assert!(gain.is_settled());
}

#[test]
fn lfo_swept_filter_stays_in_range() {
    let sample_rate = 48000.0;
    let base = 200.0;
    let octaves = 2.5;
    let mut lfo = Lfo::new(sample_rate, 5.0);
    let mut svf = StateVariableFilter::new(sample_rate);
    svf.set_output_type(SvfOutput::Lowpass);

    let ceiling = base * octave_ratio(octaves);
    for i in 0..48_000 {
        let cutoff = base * octave_ratio(octaves * lfo.next_unipolar());
        assert!(cutoff >= base - 1e-3 && cutoff <= ceiling + 1e-2);
        svf.set_cutoff(cutoff);
        let x = if i % 100 == 0 { 1.0 } else { 0.0 };
        assert!(svf.process(x).is_finite());
    }
}
