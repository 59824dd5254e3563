use crate::e2e::*;
use std::time::{Duration, Instant};

#[test]
fn no_commands() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run(&mut safesys_command(vec![]))?;
    assert!(!out.status.success());
    assert_output_contains(&out, "no commands given");
    Ok(())
}

// Off Linux the serialized executor can't adopt orphans, so `true` may exit
// before it is opened for waiting, which is reported as a failure.
#[cfg(all(unix, any(target_os = "linux", not(feature = "serialized"))))]
#[test]
fn ten_trues() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.run_expect(&mut safesys_command(vec!["true"; 10]))?;
    // No handoff files left behind.
    assert!(space.list()?.is_empty());
    Ok(())
}

// The serialized executor reports the submitting shell's status instead.
#[cfg(all(unix, not(feature = "serialized")))]
#[test]
fn reports_failures() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run(&mut safesys_command(vec!["true", "exit 3"]))?;
    assert_eq!(out.status.code(), Some(1));
    assert_output_contains(&out, "safesys: exit 3: exit status: 3");
    Ok(())
}

#[cfg(unix)]
#[test]
fn missing_executable() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let start = Instant::now();
    let out = space.run(&mut safesys_command(vec!["/nonexistent/safesys-missing"]))?;
    assert!(start.elapsed() < Duration::from_secs(5));
    if !safesys::SERIALIZED {
        assert_eq!(out.status.code(), Some(1));
        assert_output_contains(&out, "exit status: 127");
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn commands_overlap() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let start = Instant::now();
    space.run_expect(&mut safesys_command(vec!["sleep 1", "sleep 1"]))?;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(950), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1800), "{:?}", elapsed);
    Ok(())
}

#[cfg(unix)]
#[test]
fn jobs_limit() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let start = Instant::now();
    space.run_expect(&mut safesys_command(vec!["-j", "1", "sleep 0.5", "sleep 0.5"]))?;
    assert!(start.elapsed() >= Duration::from_millis(950));
    Ok(())
}

#[test]
fn zero_jobs() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run(&mut safesys_command(vec!["-j", "0", "true"]))?;
    assert!(!out.status.success());
    assert_output_contains(&out, "invalid -j 0");
    Ok(())
}

#[cfg(unix)]
#[test]
fn chdir() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    std::fs::create_dir(space.path().join("sub"))?;
    space.run_expect(&mut safesys_command(vec!["-C", "sub", "sleep 0.1 && touch out"]))?;
    assert!(space.read("sub/out").is_ok());
    Ok(())
}

#[test]
fn debug_list() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run(&mut safesys_command(vec!["-d", "list"]))?;
    assert_output_contains(&out, "trace  generate json performance trace");
    Ok(())
}

#[cfg(unix)]
#[test]
fn debug_trace() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.run_expect(&mut safesys_command(vec!["-d", "trace", "sleep 0.1", "sleep 0.1"]))?;
    let trace = String::from_utf8(space.read("trace.json")?)?;
    assert_eq!(trace.matches("\"name\": \"command\"").count(), 2);
    assert!(trace.ends_with("]\n"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn verbose_logs_to_stderr() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run_expect(&mut safesys_command(vec!["-v", "sleep 0.1"]))?;
    // Only the serialized executor has anything to say about a command
    // that succeeded.
    if safesys::SERIALIZED {
        assert!(std::str::from_utf8(&out.stderr)?.contains("*SYSTEM* >>sleep 0.1 &"));
    }
    assert!(out.stdout.is_empty());
    Ok(())
}
