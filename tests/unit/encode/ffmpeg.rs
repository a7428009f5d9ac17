use super::*;

fn job() -> EncodeJob {
    EncodeJob {
        input_pattern: PathBuf::from("frames/%010d.png"),
        fps: Fps::default(),
        out_path: PathBuf::from("out/output.m4v"),
    }
}

#[test]
fn job_validation_catches_bad_values() {
    assert!(job().validate().is_ok());
    assert!(
        EncodeJob {
            fps: Fps { num: 0, den: 1 },
            ..job()
        }
        .validate()
        .is_err()
    );
    assert!(
        EncodeJob {
            out_path: PathBuf::new(),
            ..job()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn ffmpeg_args_read_the_png_sequence() {
    let args = FfmpegEncoder::default().args(&job());
    let args: Vec<String> = args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "-framerate",
            "24",
            "-i",
            "frames/%010d.png",
            "-pix_fmt",
            "yuv420p",
            "out/output.m4v",
        ]
    );
}

#[test]
fn missing_program_is_reported() {
    let enc = FfmpegEncoder {
        program: PathBuf::from("belleroom-no-such-encoder"),
        ..FfmpegEncoder::default()
    };
    assert!(matches!(enc.check_available(), Err(BelleError::Encode(_))));
    assert!(matches!(enc.encode(&job()), Err(BelleError::Encode(_))));
}

#[test]
fn nonzero_exit_is_an_encode_error() {
    let enc = FfmpegEncoder {
        program: PathBuf::from("false"),
        ..FfmpegEncoder::default()
    };
    let err = enc.encode(&job()).unwrap_err();
    assert!(matches!(err, BelleError::Encode(_)));
    assert!(err.to_string().contains("false exited with status"));
}

#[cfg(target_os = "linux")]
#[test]
fn failed_encode_reports_stderr() {
    // `ls` rejects `-framerate` and explains why on stderr.
    let enc = FfmpegEncoder {
        program: PathBuf::from("ls"),
        ..FfmpegEncoder::default()
    };
    let err = enc.encode(&job()).unwrap_err();
    assert!(matches!(err, BelleError::Encode(_)));
    assert!(err.to_string().contains("option"), "{err}");
}

#[test]
fn prepare_output_path_removes_stale_file() {
    let dir = std::env::temp_dir().join(format!(
        "belleroom_prepare_output_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let out = dir.join("nested").join("video.m4v");
    prepare_output_path(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());

    std::fs::write(&out, b"old").unwrap();
    prepare_output_path(&out).unwrap();
    assert!(!out.exists());

    let _ = std::fs::remove_dir_all(&dir);
}
