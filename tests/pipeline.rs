//! End-to-end tests over the public API

use std::f64::consts::PI;
use std::path::PathBuf;

use logspec::{
    compute_spectrogram, compute_stft, fft_bin_frequencies, frame_count, hop_size,
    log_scale_boundaries, rebin_to_log_scale, to_decibel_matrix, AudioInput, Complex64,
    SpectrogramConfig, SpectrogramError, Window,
};

fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * PI * freq * i as f64 / f64::from(sample_rate)).sin() as f32)
        .collect()
}

fn temp_wav(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("logspec-{}-{}.wav", std::process::id(), name))
}

#[test]
fn shape_follows_padding_geometry() {
    let signal = sine(300.0, 8000, 777);
    for &(frame_size, overlap) in &[(256usize, 0.5f64), (100, 0.0), (33, 0.9), (7, 0.25)] {
        let spec = compute_stft(&signal, 8000, frame_size, overlap, &Window::Hann).unwrap();
        let hop = hop_size(frame_size, overlap).unwrap();
        let padded = frame_size / 2 + signal.len();
        let expected = ((padded - frame_size) as f64 / hop as f64).ceil() as usize + 1;
        assert_eq!(spec.nrows(), expected);
        assert_eq!(spec.nrows(), frame_count(signal.len(), frame_size, hop));
        assert_eq!(spec.ncols(), frame_size / 2 + 1);
    }
}

#[test]
fn sine_peak_lands_near_its_frequency() {
    let sample_rate = 44100;
    let frame_size = 256;
    let signal = sine(440.0, sample_rate, 1024);
    let spec = compute_stft(&signal, sample_rate, frame_size, 0.5, &Window::Hann).unwrap();

    let (mut best_row, mut best_mag) = (0, 0.0);
    for (t, row) in spec.rows().into_iter().enumerate() {
        let peak = row.iter().map(|c| c.norm()).fold(0.0, f64::max);
        if peak > best_mag {
            best_row = t;
            best_mag = peak;
        }
    }
    let row = spec.row(best_row);
    let (peak_col, _) = row
        .iter()
        .enumerate()
        .fold((0, 0.0), |(bi, bm), (i, c)| {
            if c.norm() > bm {
                (i, c.norm())
            } else {
                (bi, bm)
            }
        });

    let allfreqs = fft_bin_frequencies(spec.ncols(), sample_rate);
    let bin_width = f64::from(sample_rate) / frame_size as f64;
    assert!(
        (allfreqs[peak_col] - 440.0).abs() <= bin_width,
        "peak at column {} ({} Hz)",
        peak_col,
        allfreqs[peak_col]
    );
}

#[test]
fn rebinning_partitions_every_frame() {
    let mut signal = sine(1200.0, 16000, 5000);
    signal
        .iter_mut()
        .zip(sine(90.0, 16000, 5000))
        .for_each(|(a, b)| *a += 0.5 * b);
    let spec = compute_stft(&signal, 16000, 1024, 0.75, &Window::Hamming).unwrap();

    for &factor in &[1.0, 2.5, 20.0] {
        let rebinned = rebin_to_log_scale(&spec, 16000, factor).unwrap();
        assert_eq!(rebinned.values.nrows(), spec.nrows());
        assert_eq!(
            rebinned.boundaries,
            log_scale_boundaries(spec.ncols(), factor).unwrap()
        );
        for (orig, merged) in spec.rows().into_iter().zip(rebinned.values.rows()) {
            let a: Complex64 = orig.sum();
            let b: Complex64 = merged.sum();
            let scale = orig.iter().map(|c| c.norm()).sum::<f64>().max(1.0);
            assert!((a - b).norm() <= 1e-9 * scale);
        }
    }
}

#[test]
fn stronger_warp_gives_fewer_bins() {
    let spec = compute_stft(&sine(500.0, 8000, 4000), 8000, 512, 0.5, &Window::Hann).unwrap();
    let linear = rebin_to_log_scale(&spec, 8000, 1.0).unwrap();
    let warped = rebin_to_log_scale(&spec, 8000, 20.0).unwrap();
    assert_eq!(linear.values.ncols(), spec.ncols());
    assert!(warped.values.ncols() < linear.values.ncols());
}

#[test]
fn single_sample_frames_pass_through_rebinning() {
    let signal = sine(50.0, 1000, 40);
    let spec = compute_stft(&signal, 1000, 1, 0.5, &Window::Hann).unwrap();
    assert_eq!(spec.ncols(), 1);
    let rebinned = rebin_to_log_scale(&spec, 1000, 20.0).unwrap();
    assert_eq!(rebinned.values, spec);
    assert_eq!(rebinned.freq_axis, vec![0.0]);
}

#[test]
fn silence_is_uniformly_negative_infinity() {
    for &len in &[1usize, 10, 3000] {
        let out =
            compute_spectrogram(&vec![0.0f32; len], 22050, &SpectrogramConfig::default()).unwrap();
        assert!(out.decibels.iter().all(|&db| db == f64::NEG_INFINITY));
    }
}

#[test]
fn louder_input_gives_higher_levels() {
    let quiet = sine(1000.0, 8000, 2048);
    let loud: Vec<f32> = quiet.iter().map(|s| s * 4.0).collect();
    let config = SpectrogramConfig {
        frame_size: 256,
        ..Default::default()
    };
    let a = compute_spectrogram(&quiet, 8000, &config).unwrap();
    let b = compute_spectrogram(&loud, 8000, &config).unwrap();
    let gain = 20.0 * 4f64.log10();
    for (x, y) in a.decibels.iter().zip(b.decibels.iter()) {
        if x.is_finite() {
            assert!((y - x - gain).abs() < 1e-6);
        }
    }
}

#[test]
fn stages_compose_like_the_pipeline() {
    let signal = sine(700.0, 11025, 3000);
    let config = SpectrogramConfig {
        frame_size: 512,
        overlap: 0.5,
        warp_factor: 3.0,
        window: Window::Hann,
    };
    let spec = compute_stft(&signal, 11025, 512, 0.5, &Window::Hann).unwrap();
    let rebinned = rebin_to_log_scale(&spec, 11025, 3.0).unwrap();
    let decibels = to_decibel_matrix(&rebinned.values);

    let out = compute_spectrogram(&signal, 11025, &config).unwrap();
    assert_eq!(out.decibels.dim(), decibels.dim());
    assert_eq!(out.freq_axis, rebinned.freq_axis);
    for (x, y) in out.decibels.iter().zip(decibels.iter()) {
        assert!((x - y).abs() < 1e-9 || (x.is_infinite() && x == y));
    }
}

#[test]
fn parameter_errors_are_reported() {
    let signal = sine(100.0, 8000, 100);
    let err = compute_stft(&signal, 8000, 64, 1.5, &Window::Hann).unwrap_err();
    assert!(matches!(err, SpectrogramError::InvalidParameter(_)));
    let err = rebin_to_log_scale(
        &compute_stft(&signal, 8000, 64, 0.5, &Window::Hann).unwrap(),
        8000,
        0.0,
    )
    .unwrap_err();
    assert!(matches!(err, SpectrogramError::InvalidParameter(_)));
}

#[test]
fn reads_wav_channels() {
    let path = temp_wav("stereo");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..400i16 {
        writer.write_sample(i * 10).unwrap();
        writer.write_sample(-i * 10).unwrap();
    }
    writer.finalize().unwrap();

    let left = AudioInput::open(&path, 0).unwrap();
    assert_eq!(left.sample_rate(), 8000);
    assert_eq!(left.samples().len(), 400);
    assert!((left.samples()[10] - 100.0 / 32768.0).abs() < 1e-7);

    let right = AudioInput::open(&path, 1).unwrap();
    assert!((right.samples()[10] + 100.0 / 32768.0).abs() < 1e-7);

    assert!(matches!(
        AudioInput::open(&path, 2),
        Err(SpectrogramError::InvalidParameter(_))
    ));

    let out = compute_spectrogram(
        left.samples(),
        left.sample_rate(),
        &SpectrogramConfig {
            frame_size: 128,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out.sample_count, 400);
    assert_eq!(left.into_samples().len(), 400);

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_an_audio_error() {
    let err = AudioInput::open(temp_wav("does-not-exist"), 0).err().unwrap();
    assert!(matches!(err, SpectrogramError::Audio(_)));
}
