use std::fs;
use std::path::Path;
use std::process::Command;

const BIN_PATH: &str = env!("CARGO_BIN_EXE_warp");

fn run(args: &[&str]) -> std::process::Output {
    Command::new(Path::new(BIN_PATH))
        .args(args)
        .output()
        .expect("failed to run warp binary")
}

fn write_pseudo_random_file(path: &Path, len: usize) {
    let mut state: u64 = 0x9E3779B97F4A7C15;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xff) as u8);
    }
    fs::write(path, data).unwrap();
}

#[test]
fn compress_then_decompress_round_trips_incompressible_data() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    write_pseudo_random_file(&input, 500_000);

    let warp = dir.path().join("input.bin.warp");
    let out = run(&[
        "compress",
        input.to_str().unwrap(),
        "-o",
        warp.to_str().unwrap(),
        "--chunk-bytes",
        "65536",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(warp.exists());

    let restored = dir.path().join("restored.bin");
    let out = run(&[
        "decompress",
        warp.to_str().unwrap(),
        "-o",
        restored.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert_eq!(fs::read(&input).unwrap(), fs::read(&restored).unwrap());
}

#[test]
fn compress_then_decompress_round_trips_all_zero_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zeros.bin");
    fs::write(&input, vec![0u8; 200_000]).unwrap();

    let warp = dir.path().join("zeros.bin.warp");
    let out = run(&[
        "compress",
        input.to_str().unwrap(),
        "-o",
        warp.to_str().unwrap(),
        "--chunk-bytes",
        "8192",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let restored = dir.path().join("zeros.out");
    let out = run(&[
        "decompress",
        warp.to_str().unwrap(),
        "-o",
        restored.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(fs::read(&restored).unwrap(), vec![0u8; 200_000]);

    // All-zero chunks carry no payload bytes, so the container stays tiny.
    assert!(fs::metadata(&warp).unwrap().len() < 200_000);
}

#[test]
fn pinned_algo_and_checksum_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("text.bin");
    fs::write(&input, "the quick brown fox jumps over the lazy dog\n".repeat(5000)).unwrap();

    let warp = dir.path().join("text.bin.warp");
    let out = run(&[
        "compress",
        input.to_str().unwrap(),
        "-o",
        warp.to_str().unwrap(),
        "--algo",
        "lz4",
        "--checksum",
        "--chunk-bytes",
        "16384",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("lz4"));
    assert!(stdout.contains("checksum"));

    let restored = dir.path().join("text.out");
    let out = run(&[
        "decompress",
        warp.to_str().unwrap(),
        "-o",
        restored.to_str().unwrap(),
        "--verify",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("checksum OK"));
    assert_eq!(fs::read(&input).unwrap(), fs::read(&restored).unwrap());
}

#[test]
fn decompressing_a_non_warp_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notwarp.bin");
    fs::write(&input, b"just some plain bytes, not a container").unwrap();

    let restored = dir.path().join("out.bin");
    let out = run(&[
        "decompress",
        input.to_str().unwrap(),
        "-o",
        restored.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
}
