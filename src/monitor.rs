use crate::agent::DqnAgent;
use crate::config::MonitorConfig;
use crate::environment::Environment;
use crate::error::{Result, QtrainError};
use crate::metrics::{EvalRecord, RollingWindow, TrainingLog};
use crate::reporter::Reporter;

/// Summary of a completed [`Monitor::train`] run.
#[derive(Debug, Clone, Copy)]
pub struct TrainReport {
    /// Episodes actually run (may be below the configured budget when solved)
    pub episodes: usize,
    /// Whether the rolling reward average reached the solved criterion
    pub solved: bool,
    /// Environment steps taken during training
    pub total_steps: usize,
    /// Exploration rate when training stopped
    pub final_epsilon: f32,
}

/// Drives episodes against an environment, delegating decisions and learning
/// to the agent.
///
/// One polymorphic control loop, parameterized over the [`Environment`] and
/// [`Reporter`] capabilities. The monitor tracks rolling reward/length
/// statistics, triggers periodic reporting and evaluation, and persists the
/// agent once the solved criterion is met.
pub struct Monitor<E: Environment, R: Reporter> {
    agent: DqnAgent,
    env: E,
    reporter: R,
    config: MonitorConfig,
    counter_steps: usize,
    rewards_window: RollingWindow,
    steps_window: RollingWindow,
    log: TrainingLog,
}

impl<E: Environment, R: Reporter> Monitor<E, R> {
    /// Wire an agent to an environment. Fails fast when the monitor
    /// configuration is out of domain or the environment's shapes do not
    /// match what the agent was built for.
    pub fn new(agent: DqnAgent, env: E, config: MonitorConfig, reporter: R) -> Result<Self> {
        config.validate()?;

        if env.state_dim() != agent.config.state_dim {
            return Err(QtrainError::invalid_parameter(
                "state_dim",
                "environment state shape does not match the agent's",
            ));
        }
        if env.action_dim() != agent.config.action_dim {
            return Err(QtrainError::invalid_parameter(
                "action_dim",
                "environment action count does not match the agent's",
            ));
        }

        let rewards_window = RollingWindow::new(config.window);
        let steps_window = RollingWindow::new(config.window);

        Ok(Monitor {
            agent,
            env,
            reporter,
            config,
            counter_steps: 0,
            rewards_window,
            steps_window,
            log: TrainingLog::new(),
        })
    }

    /// Run the training loop: up to `train_episodes` episodes, decaying
    /// epsilon once per episode, reporting every `report_freq` episodes and
    /// evaluating every `eval_freq` episodes once warmup is over. Stops
    /// early when the rolling reward average reaches the solved criterion,
    /// checkpointing the agent and running a final evaluation pass.
    pub fn train(&mut self) -> Result<TrainReport> {
        self.agent.training = true;
        self.reporter.note("training started");

        for i_episode in 1..=self.config.train_episodes {
            let (episode_reward, episode_steps, loss) = self.train_episode()?;
            self.agent.update_epsilon();

            self.rewards_window.push(episode_reward);
            self.steps_window.push(episode_steps as f32);

            let reward_avg = self.rewards_window.mean().unwrap_or(f32::NEG_INFINITY);

            if reward_avg >= self.config.reward_solved_criteria {
                self.report(i_episode, true, loss);
                if let Some(path) = self.config.checkpoint_path.clone() {
                    self.agent.save(&path)?;
                    self.reporter.note(&format!("checkpoint written to {}", path));
                }
                self.evaluate()?;
                return Ok(TrainReport {
                    episodes: i_episode,
                    solved: true,
                    total_steps: self.counter_steps,
                    final_epsilon: self.agent.epsilon,
                });
            }

            if i_episode % self.config.report_freq == 0 {
                self.report(i_episode, false, loss);
            }

            if i_episode % self.config.eval_freq == 0
                && self.agent.counter_steps >= self.agent.config.learn_start
            {
                self.reporter
                    .note(&format!("evaluating @ step {}", self.counter_steps));
                self.evaluate()?;
                self.reporter
                    .note(&format!("resuming training @ step {}", self.counter_steps));
            }
        }

        Ok(TrainReport {
            episodes: self.config.train_episodes,
            solved: false,
            total_steps: self.counter_steps,
            final_epsilon: self.agent.epsilon,
        })
    }

    /// One training episode: act, step, observe, up to the per-episode step
    /// cap or until the environment reports `done`. Returns the episode
    /// reward, its length, and the mean loss over the learning updates that
    /// ran inside it.
    fn train_episode(&mut self) -> Result<(f32, usize, Option<f32>)> {
        let mut state = self.env.reset()?;
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;
        let mut losses = RollingWindow::new(100);

        for _ in 0..self.config.max_steps_in_episode {
            let action = self.agent.act(state.view());
            let outcome = self.env.step(action)?;

            let maybe_loss = self.agent.observe_and_step(crate::replay_buffer::Transition {
                state,
                action,
                reward: outcome.reward,
                next_state: outcome.next_state.clone(),
                done: outcome.done,
            })?;
            if let Some(loss) = maybe_loss {
                losses.push(loss);
            }

            state = outcome.next_state;
            episode_reward += outcome.reward;
            episode_steps += 1;
            self.counter_steps += 1;

            if outcome.done {
                break;
            }
        }

        Ok((episode_reward, episode_steps, losses.mean()))
    }

    /// Deterministic rollout bounded by a step budget, not an episode
    /// budget: runs until `eval_steps` environment steps have elapsed,
    /// resetting whenever an episode terminates, and tallies the episodes
    /// completed inside the budget. Exploration and learning stay off for
    /// the whole pass; the agent's training mode is restored afterwards.
    pub fn evaluate(&mut self) -> Result<EvalRecord> {
        let was_training = self.agent.training;
        self.agent.training = false;

        let mut episodes_solved = 0;
        let mut episode_reward = 0.0;
        let mut episode_steps = 0usize;
        let mut finished_rewards: Vec<f32> = Vec::new();
        let mut finished_steps: Vec<f32> = Vec::new();
        let mut state_value_sum = 0.0;

        let mut state = self.env.reset()?;

        for eval_step in 0..self.config.eval_steps {
            let action = self.agent.act(state.view());
            let q_values = self.agent.q_values(state.view());
            state_value_sum += q_values.mean().unwrap_or(0.0);

            let outcome = self.env.step(action)?;
            if let Some(frame) = self.env.render() {
                self.reporter.frame(eval_step, frame.view());
            }

            episode_reward += outcome.reward;
            episode_steps += 1;
            state = outcome.next_state;

            if outcome.done {
                episodes_solved += 1;
                finished_rewards.push(episode_reward);
                finished_steps.push(episode_steps as f32);
                episode_reward = 0.0;
                episode_steps = 0;
                state = self.env.reset()?;
            }
        }

        self.agent.training = was_training;

        let mean = |values: &[f32]| {
            if values.is_empty() {
                f32::NAN
            } else {
                values.iter().sum::<f32>() / values.len() as f32
            }
        };

        let record = EvalRecord {
            at_step: self.counter_steps,
            episodes_solved,
            reward_avg: mean(&finished_rewards),
            steps_avg: mean(&finished_steps),
            state_value_avg: state_value_sum / self.config.eval_steps as f32,
        };

        self.reporter
            .scalar("eval_reward_avg", record.at_step, record.reward_avg);
        self.reporter
            .scalar("eval_steps_avg", record.at_step, record.steps_avg);
        self.reporter.scalar(
            "eval_episodes_solved",
            record.at_step,
            record.episodes_solved as f32,
        );
        self.log.evals.push(record);

        Ok(record)
    }

    /// Greedy rollouts for inspection: `n_episodes` full episodes with
    /// exploration and learning off, rendering frames through the reporter.
    /// Returns each episode's total reward.
    pub fn play(&mut self, n_episodes: usize) -> Result<Vec<f32>> {
        let was_training = self.agent.training;
        self.agent.training = false;

        let mut rewards = Vec::with_capacity(n_episodes);
        let mut frame_index = 0;

        for _ in 0..n_episodes {
            let mut state = self.env.reset()?;
            let mut episode_reward = 0.0;

            for _ in 0..self.config.max_steps_in_episode {
                let action = self.agent.act(state.view());
                let outcome = self.env.step(action)?;
                if let Some(frame) = self.env.render() {
                    self.reporter.frame(frame_index, frame.view());
                }
                frame_index += 1;
                episode_reward += outcome.reward;
                state = outcome.next_state;
                if outcome.done {
                    break;
                }
            }

            rewards.push(episode_reward);
        }

        self.agent.training = was_training;
        Ok(rewards)
    }

    fn report(&mut self, i_episode: usize, solved: bool, loss: Option<f32>) {
        let reward_avg = self.rewards_window.mean().unwrap_or(0.0);
        let steps_avg = self.steps_window.mean().unwrap_or(0.0);

        if solved {
            self.reporter
                .note(&format!("environment solved in {} episodes", i_episode));
        }
        self.reporter.note(&format!(
            "episode {} | step {} | epsilon {:.4} | avg reward {:.2} | avg steps {:.1}",
            i_episode, self.counter_steps, self.agent.epsilon, reward_avg, steps_avg
        ));

        self.reporter.scalar("reward_avg", i_episode, reward_avg);
        self.reporter.scalar("steps_avg", i_episode, steps_avg);
        self.reporter.scalar("epsilon", i_episode, self.agent.epsilon);

        self.log.reward_avg.push((i_episode, reward_avg));
        self.log.steps_avg.push((i_episode, steps_avg));
        self.log.epsilon.push((i_episode, self.agent.epsilon));
        if let Some(loss) = loss {
            self.reporter.scalar("loss", i_episode, loss);
            self.log.loss.push((i_episode, loss));
        }
    }

    pub fn agent(&self) -> &DqnAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut DqnAgent {
        &mut self.agent
    }

    /// Scalar series accumulated so far.
    pub fn log(&self) -> &TrainingLog {
        &self.log
    }

    /// Total environment steps taken by training episodes.
    pub fn total_steps(&self) -> usize {
        self.counter_steps
    }

    /// Tear the monitor down, handing the trained agent back.
    pub fn into_agent(self) -> DqnAgent {
        self.agent
    }
}
