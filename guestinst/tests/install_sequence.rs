//! Full install sequence against a recording console.

use std::time::Duration;

use guestinst::error::ChannelError;
use guestinst::{Console, Error, GuestStatus, InstallConfig, InstallDriver, Pattern};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Matched(String),
    Sent(String),
    Waited,
}

/// Console that satisfies every pattern as soon as it is asked for, until
/// `close_after` patterns have matched.
struct RecordingConsole {
    events: Vec<(Instant, Event)>,
    close_after: Option<usize>,
    matched: usize,
    status: GuestStatus,
}

impl RecordingConsole {
    fn new(status: GuestStatus) -> Self {
        Self {
            events: Vec::new(),
            close_after: None,
            matched: 0,
            status,
        }
    }

    fn closing_after(matches: usize) -> Self {
        Self {
            close_after: Some(matches),
            ..Self::new(GuestStatus::from_code(0))
        }
    }

    fn sent(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|(_, e)| match e {
                Event::Sent(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Console for RecordingConsole {
    async fn expect(&mut self, pattern: &Pattern, timeout: Option<Duration>) -> guestinst::error::Result<Vec<u8>> {
        assert!(timeout.is_none(), "install waits must not time out");
        if self.close_after == Some(self.matched) {
            return Err(ChannelError::SessionClosed {
                pattern: pattern.as_str().to_string(),
            }
            .into());
        }
        self.matched += 1;
        self.events
            .push((Instant::now(), Event::Matched(pattern.as_str().to_string())));
        Ok(Vec::new())
    }

    async fn send(&mut self, text: &str) -> guestinst::error::Result<()> {
        self.events.push((Instant::now(), Event::Sent(text.to_string())));
        Ok(())
    }

    async fn wait(&mut self) -> guestinst::error::Result<GuestStatus> {
        self.events.push((Instant::now(), Event::Waited));
        Ok(self.status)
    }
}

/// Runs the sequence and hands back the console for inspection.
async fn run(
    console: RecordingConsole,
    config: InstallConfig,
) -> (guestinst::error::Result<GuestStatus>, RecordingConsole) {
    let mut driver = InstallDriver::new(console, config).unwrap();
    let remaining = driver.remaining();
    if let Err(e) = driver.run_steps(remaining).await {
        return (Err(e), driver.into_console());
    }
    let status = driver.console_mut().wait().await;
    (status, driver.into_console())
}

#[tokio::test(start_paused = true)]
async fn test_full_sequence_transmissions() {
    let (status, console) = run(
        RecordingConsole::new(GuestStatus::from_code(0)),
        InstallConfig::default(),
    )
    .await;

    assert_eq!(
        console.sent(),
        vec![
            "2",
            "\n",
            "mount -rt cd9660 /dev/cd1 /mnt\n",
            "/bin/sh -x /mnt/base.sh\n",
            "umount /targetroot\n",
            "umount /mnt\n",
            "halt -p\n",
        ]
    );
    assert!(status.unwrap().success());
    assert_eq!(console.events.last().map(|(_, e)| e), Some(&Event::Waited));
}

#[tokio::test(start_paused = true)]
async fn test_every_send_follows_its_match() {
    let (_, console) = run(
        RecordingConsole::new(GuestStatus::from_code(0)),
        InstallConfig::default(),
    )
    .await;

    let kinds: Vec<&Event> = console.events.iter().map(|(_, e)| e).collect();
    let expected_patterns = [
        "seconds",
        "Enter pathname of shell or RETURN for /bin/sh:",
        "\n# ",
        "\n# ",
        "\n# ",
        "\n# ",
        "\n# ",
    ];

    // Strictly alternating: match, send, match, send, ... then wait
    assert_eq!(kinds.len(), expected_patterns.len() * 2 + 1);
    for (i, pattern) in expected_patterns.iter().enumerate() {
        assert_eq!(kinds[i * 2], &Event::Matched(pattern.to_string()));
        assert!(matches!(kinds[i * 2 + 1], Event::Sent(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_between_prompt_and_command() {
    let (_, console) = run(
        RecordingConsole::new(GuestStatus::from_code(0)),
        InstallConfig::default(),
    )
    .await;

    let settle = Duration::from_secs(1);
    for pair in console.events.windows(2) {
        let (matched_at, matched) = &pair[0];
        let (sent_at, sent) = &pair[1];
        match (matched, sent) {
            (Event::Matched(p), Event::Sent(_)) if p == "\n# " => {
                assert!(*sent_at - *matched_at >= settle);
            }
            (Event::Matched(_), Event::Sent(_)) => {
                // Prompt responses go out immediately
                assert_eq!(*sent_at, *matched_at);
            }
            _ => {}
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_closed_before_countdown_sends_nothing() {
    let (result, console) = run(RecordingConsole::closing_after(0), InstallConfig::default()).await;

    assert!(matches!(
        result,
        Err(Error::Channel(ChannelError::SessionClosed { ref pattern })) if pattern == "seconds"
    ));
    assert!(console.sent().is_empty());
    assert!(!console.events.iter().any(|(_, e)| *e == Event::Waited));
}

#[tokio::test(start_paused = true)]
async fn test_closed_mid_sequence_stops_there() {
    let (result, console) = run(RecordingConsole::closing_after(3), InstallConfig::default()).await;

    assert!(result.is_err());
    assert_eq!(
        console.sent(),
        vec!["2", "\n", "mount -rt cd9660 /dev/cd1 /mnt\n"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_result_is_guest_status() {
    for code in [0, 1] {
        let driver = InstallDriver::new(
            RecordingConsole::new(GuestStatus::from_code(code)),
            InstallConfig::default(),
        )
        .unwrap();
        let status = driver.run_install_sequence().await.unwrap();
        assert_eq!(status.code(), Some(code));
        assert_eq!(status.exit_code(), code);
    }
}

#[tokio::test(start_paused = true)]
async fn test_filter_output_does_not_change_transmissions() {
    let (_, unfiltered) = run(
        RecordingConsole::new(GuestStatus::from_code(0)),
        InstallConfig::default(),
    )
    .await;
    let (_, filtered) = run(
        RecordingConsole::new(GuestStatus::from_code(0)),
        InstallConfig {
            filter_output: true,
            ..Default::default()
        },
    )
    .await;

    assert_eq!(unfiltered.sent(), filtered.sent());
}
