use crate::config::{AgentConfig, MonitorConfig};
use crate::error::QtrainError;

fn assert_invalid(result: crate::error::Result<()>, expected_name: &str) {
    match result {
        Err(QtrainError::InvalidParameter { name, .. }) => assert_eq!(name, expected_name),
        other => panic!("expected InvalidParameter for {}, got {:?}", expected_name, other),
    }
}

#[test]
fn test_default_agent_config_is_valid() {
    assert!(AgentConfig::default().validate().is_ok());
}

#[test]
fn test_agent_config_domains() {
    let base = AgentConfig::default;

    assert_invalid(AgentConfig { state_dim: 0, ..base() }.validate(), "state_dim");
    assert_invalid(AgentConfig { action_dim: 0, ..base() }.validate(), "action_dim");
    assert_invalid(AgentConfig { memory_size: 0, ..base() }.validate(), "memory_size");
    assert_invalid(AgentConfig { batch_size: 0, ..base() }.validate(), "batch_size");
    assert_invalid(
        AgentConfig { memory_size: 10, batch_size: 11, ..base() }.validate(),
        "batch_size",
    );
    assert_invalid(AgentConfig { gamma: 1.5, ..base() }.validate(), "gamma");
    assert_invalid(AgentConfig { gamma: -0.1, ..base() }.validate(), "gamma");
    assert_invalid(AgentConfig { tau: 0.0, ..base() }.validate(), "tau");
    assert_invalid(AgentConfig { tau: 1.1, ..base() }.validate(), "tau");
    assert_invalid(AgentConfig { learning_rate: 0.0, ..base() }.validate(), "learning_rate");
    assert_invalid(AgentConfig { learn_every: 0, ..base() }.validate(), "learn_every");
    assert_invalid(AgentConfig { eps_start: 1.5, ..base() }.validate(), "eps_start");
    assert_invalid(AgentConfig { eps_end: -0.1, ..base() }.validate(), "eps_end");
    assert_invalid(
        AgentConfig { eps_start: 0.1, eps_end: 0.5, ..base() }.validate(),
        "eps_end",
    );
    assert_invalid(AgentConfig { eps_decay: 0.0, ..base() }.validate(), "eps_decay");
    assert_invalid(AgentConfig { eps_decay: 1.5, ..base() }.validate(), "eps_decay");

    // tau = 1 is legal: it degenerates to a hard copy.
    assert!(AgentConfig { tau: 1.0, ..base() }.validate().is_ok());
}

#[test]
fn test_layer_sizes() {
    let config = AgentConfig {
        state_dim: 4,
        action_dim: 2,
        hidden_layers: vec![64, 32],
        ..AgentConfig::default()
    };
    assert_eq!(config.layer_sizes(), vec![4, 64, 32, 2]);
}

#[test]
fn test_default_monitor_config_is_valid() {
    assert!(MonitorConfig::default().validate().is_ok());
}

#[test]
fn test_monitor_config_domains() {
    let base = MonitorConfig::default;

    assert_invalid(MonitorConfig { train_episodes: 0, ..base() }.validate(), "train_episodes");
    assert_invalid(
        MonitorConfig { max_steps_in_episode: 0, ..base() }.validate(),
        "max_steps_in_episode",
    );
    assert_invalid(MonitorConfig { window: 0, ..base() }.validate(), "window");
    assert_invalid(MonitorConfig { report_freq: 0, ..base() }.validate(), "report_freq");
    assert_invalid(MonitorConfig { eval_freq: 0, ..base() }.validate(), "eval_freq");
    assert_invalid(MonitorConfig { eval_steps: 0, ..base() }.validate(), "eval_steps");
}
