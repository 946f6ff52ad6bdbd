use crate::models::{Habit, HistoryCategory, Task, TrackerState};
use crate::pages::{self, Page};
use crate::stats::build_stats_at;
use crate::streak;
use chrono::NaiveDate;

pub fn render_shell(page: Page, section: &str, state: &TrackerState, today: NaiveDate) -> String {
    let nav = pages::ALL
        .iter()
        .map(|p| {
            let class = if *p == page { "tab active" } else { "tab" };
            format!(
                "<a class=\"{class}\" href=\"/?page={}\">{}</a>",
                p.key(),
                p.title()
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    let dev_panel = if state.developer_mode {
        render_dev_panel()
    } else {
        String::new()
    };

    SHELL_HTML
        .replace("{{TITLE}}", page.title())
        .replace("{{NAV}}", &nav)
        .replace("{{DATE}}", &today.to_string())
        .replace("{{LEVEL}}", &state.level.to_string())
        .replace("{{XP_INTO}}", &(state.total_xp % 100).to_string())
        .replace("{{SECTION}}", section)
        .replace("{{DEV_PANEL}}", &dev_panel)
}

pub fn render_dashboard(state: &TrackerState, today: NaiveDate) -> String {
    let habits = if state.habits.is_empty() {
        "<p class=\"empty\">No habits yet. Add one above.</p>".to_string()
    } else {
        state
            .habits
            .iter()
            .map(|habit| render_habit_card(habit, today))
            .collect()
    };

    let tasks = if state.tasks.is_empty() {
        "<p class=\"empty\">Nothing pending.</p>".to_string()
    } else {
        state.tasks.iter().map(render_task_card).collect()
    };

    DASHBOARD_SECTION
        .replace("{{HABITS}}", &habits)
        .replace("{{TASKS}}", &tasks)
}

pub fn render_stats(state: &TrackerState, today: NaiveDate) -> String {
    let stats = build_stats_at(today, state);
    STATS_SECTION
        .replace("{{TOTAL_XP}}", &stats.total_xp.to_string())
        .replace("{{LEVEL}}", &stats.level.to_string())
        .replace("{{HABIT_DONE}}", &stats.totals.habits.to_string())
        .replace("{{TASK_DONE}}", &stats.totals.tasks.to_string())
        .replace("{{FOCUS_DONE}}", &stats.totals.focus_sessions.to_string())
}

pub fn render_focus(state: &TrackerState, _today: NaiveDate) -> String {
    let sessions = state
        .history
        .iter()
        .filter(|entry| entry.category == HistoryCategory::FocusSession)
        .count();
    FOCUS_SECTION.replace("{{SESSIONS}}", &sessions.to_string())
}

fn render_habit_card(habit: &Habit, today: NaiveDate) -> String {
    let name = escape(&habit.name);
    let days = if habit.streak == 1 { "day" } else { "days" };
    let done = streak::is_completed_today(habit, today);
    let card_class = if done { "card habit done" } else { "card habit" };
    let disabled = if done { " disabled" } else { "" };
    let label = if done { "Done today" } else { "Complete" };
    format!(
        r#"<div class="{card_class}" data-name="{name}">
        <span class="card-name">{name}</span>
        <span class="card-streak">{streak} {days}</span>
        <div class="card-actions">
          <button type="button" data-action="complete"{disabled}>{label}</button>
          <button type="button" class="ghost" data-action="delete">Remove</button>
        </div>
      </div>
"#,
        streak = habit.streak,
    )
}

fn render_task_card(task: &Task) -> String {
    let name = escape(&task.name);
    format!(
        r#"<div class="card task" data-name="{name}">
        <span class="card-name">{name}</span>
        <div class="card-actions">
          <button type="button" data-action="complete">Done</button>
        </div>
      </div>
"#,
    )
}

fn render_dev_panel() -> String {
    let registry = pages::ALL
        .iter()
        .map(|p| format!("<li><code>{}</code> {}</li>", p.key(), p.title()))
        .collect::<String>();
    DEV_PANEL_HTML.replace("{{REGISTRY}}", &registry)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const SHELL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker · {{TITLE}}</title>
  <style>
    :root {
      --bg: #050505;
      --panel: #0d0d0d;
      --panel-2: #080808;
      --line: #1a1a1a;
      --ink: #f2f2f2;
      --muted: #6f6f6f;
      --faint: #444;
      --glow: 0 0 15px rgba(255, 255, 255, 0.35);
      --danger: #c63b2b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      display: grid;
      gap: 24px;
    }

    header {
      display: grid;
      gap: 8px;
    }

    .header-tag {
      margin: 0;
      font-size: 10px;
      color: var(--faint);
      letter-spacing: 4px;
      font-weight: 800;
      text-transform: uppercase;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
      font-weight: 600;
    }

    h2 {
      margin: 0;
      font-size: 1.1rem;
      font-weight: 600;
    }

    .level-row {
      display: flex;
      align-items: baseline;
      justify-content: space-between;
    }

    .level {
      font-family: ui-monospace, "SFMono-Regular", monospace;
      font-size: 1.3rem;
      font-weight: 700;
    }

    .xp-label {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .xp-bar {
      background: #111;
      border-radius: 50px;
      height: 10px;
      width: 100%;
      overflow: hidden;
    }

    .xp-progress {
      background: #fff;
      height: 100%;
      box-shadow: var(--glow);
      transition: width 600ms ease;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: var(--panel-2);
      border: 1px solid var(--line);
      border-radius: 999px;
      width: fit-content;
      margin-top: 8px;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 16px;
      font-size: 0.9rem;
      font-weight: 600;
      color: var(--muted);
      text-decoration: none;
    }

    .tab.active {
      background: #fff;
      color: #000;
    }

    .columns {
      display: grid;
      grid-template-columns: 1.6fr 1fr;
      gap: 20px;
    }

    .stack {
      display: grid;
      gap: 20px;
    }

    .column {
      display: grid;
      gap: 12px;
      align-content: start;
    }

    .column-head {
      display: grid;
      gap: 10px;
    }

    form {
      display: flex;
      gap: 8px;
    }

    input[type="text"],
    input:not([type]) {
      flex: 1;
      background: var(--panel-2);
      border: 1px solid var(--line);
      border-radius: 8px;
      color: var(--ink);
      padding: 10px 12px;
      font: inherit;
    }

    input:focus {
      outline: 1px solid #fff;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 8px;
      padding: 10px 16px;
      font-size: 0.9rem;
      font-weight: 600;
      cursor: pointer;
      background: #fff;
      color: #000;
    }

    button:disabled {
      background: var(--line);
      color: var(--muted);
      cursor: default;
    }

    button.ghost,
    .button-link {
      background: transparent;
      color: var(--muted);
      border: 1px solid var(--line);
      text-decoration: none;
      font-size: 0.85rem;
      padding: 9px 14px;
      border-radius: 8px;
    }

    button.danger {
      background: var(--danger);
      color: #fff;
    }

    button.small {
      padding: 6px 10px;
      font-size: 0.75rem;
    }

    .card {
      background: linear-gradient(145deg, var(--panel), var(--panel-2));
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 16px 20px;
      display: flex;
      align-items: center;
      gap: 14px;
    }

    .card.habit {
      border-left: 5px solid #fff;
    }

    .card.habit.done {
      border-left-color: var(--faint);
      opacity: 0.75;
    }

    .card.task {
      border-radius: 8px;
      padding: 12px 16px;
    }

    .card-name {
      flex: 1;
      font-weight: 600;
      overflow-wrap: anywhere;
    }

    .card-streak {
      color: var(--muted);
      font-size: 0.85rem;
      white-space: nowrap;
    }

    .card-actions {
      display: flex;
      gap: 8px;
    }

    .empty {
      color: var(--faint);
      font-size: 0.9rem;
      margin: 0;
      padding: 8px 2px;
    }

    .panel-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
    }

    .stat {
      background: var(--panel-2);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px 16px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .chart-card {
      background: var(--panel-2);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 16px;
      display: grid;
      gap: 12px;
    }

    .chart-card svg {
      width: 100%;
      display: block;
    }

    .chart-card text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      font-size: 11px;
      fill: var(--muted);
    }

    .chart-card rect {
      fill: #fff;
    }

    .focus {
      justify-items: center;
      text-align: center;
    }

    .focus-setup {
      display: grid;
      gap: 14px;
      justify-items: center;
      width: min(420px, 100%);
    }

    .focus-setup input[type="range"] {
      width: 100%;
      accent-color: #fff;
    }

    .focus-run {
      display: grid;
      gap: 16px;
      justify-items: center;
      width: min(420px, 100%);
    }

    .countdown {
      font-family: ui-monospace, "SFMono-Regular", monospace;
      font-size: clamp(3.5rem, 12vw, 6rem);
      font-weight: 700;
      letter-spacing: 0.05em;
    }

    .dev-panel {
      background: var(--panel-2);
      border: 1px dashed var(--faint);
      border-radius: 12px;
      padding: 16px 20px;
      display: grid;
      gap: 10px;
    }

    .registry {
      margin: 0;
      padding-left: 18px;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .registry code {
      color: var(--ink);
    }

    .dev-actions {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .status[data-type="ok"] {
      color: #7ac98f;
    }

    footer {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .hint {
      margin: 0;
      color: var(--faint);
      font-size: 0.85rem;
    }

    @media (max-width: 640px) {
      .columns {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <p class="header-tag">Personal tracker</p>
      <h1>Habit Tracker</h1>
      <div class="level-row">
        <span class="level">LV.<span id="level">{{LEVEL}}</span></span>
        <span class="xp-label"><span id="xp-into">{{XP_INTO}}</span> / 100 XP</span>
      </div>
      <div class="xp-bar"><div id="xp-progress" class="xp-progress" style="width: {{XP_INTO}}%"></div></div>
      <nav class="tabs">
        {{NAV}}
      </nav>
    </header>

    {{SECTION}}

    {{DEV_PANEL}}

    <div class="status" id="status"></div>

    <footer>
      <p class="hint">Streaks count consecutive calendar days. Server date: {{DATE}}.</p>
      <button id="dev-toggle" class="ghost small" type="button">developer mode</button>
    </footer>
  </main>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (type === 'ok') {
        setTimeout(() => {
          statusEl.textContent = '';
          statusEl.dataset.type = '';
        }, 1200);
      }
    };

    const postJson = async (path, body) => {
      const res = await fetch(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const applyOverview = (data) => {
      document.getElementById('level').textContent = data.level;
      document.getElementById('xp-into').textContent = data.xp_into_level;
      document.getElementById('xp-progress').style.width = data.xp_into_level + '%';
    };

    document.getElementById('dev-toggle').addEventListener('click', () => {
      postJson('/api/developer/toggle')
        .then(() => location.reload())
        .catch((err) => setStatus(err.message, 'error'));
    });

    const resetBtn = document.getElementById('reset-btn');
    if (resetBtn) {
      resetBtn.addEventListener('click', () => {
        if (!confirm('Reset all habits, tasks, XP and history?')) {
          return;
        }
        postJson('/api/reset')
          .then(() => location.reload())
          .catch((err) => setStatus(err.message, 'error'));
      });
    }
  </script>
</body>
</html>
"#;

const DASHBOARD_SECTION: &str = r#"<section class="columns">
      <div class="column">
        <div class="column-head">
          <h2>Habits</h2>
          <form id="habit-form" autocomplete="off">
            <input id="habit-name" name="name" placeholder="New daily habit" maxlength="60" />
            <button type="submit">Add</button>
          </form>
        </div>
        <div id="habit-list">{{HABITS}}</div>
      </div>
      <div class="column">
        <div class="column-head">
          <h2>Tasks</h2>
          <form id="task-form" autocomplete="off">
            <input id="task-name" name="name" placeholder="One-off task" maxlength="60" />
            <button type="submit">Add</button>
          </form>
        </div>
        <div id="task-list">{{TASKS}}</div>
      </div>
    </section>

    <script>
      (() => {
        const habitList = document.getElementById('habit-list');
        const taskList = document.getElementById('task-list');

        const emptyNote = (text) => {
          const p = document.createElement('p');
          p.className = 'empty';
          p.textContent = text;
          return p;
        };

        const habitCard = (habit) => {
          const card = document.createElement('div');
          card.className = habit.completed_today ? 'card habit done' : 'card habit';
          card.dataset.name = habit.name;

          const name = document.createElement('span');
          name.className = 'card-name';
          name.textContent = habit.name;

          const streak = document.createElement('span');
          streak.className = 'card-streak';
          streak.textContent = habit.streak + (habit.streak === 1 ? ' day' : ' days');

          const actions = document.createElement('div');
          actions.className = 'card-actions';

          const complete = document.createElement('button');
          complete.type = 'button';
          complete.dataset.action = 'complete';
          complete.textContent = habit.completed_today ? 'Done today' : 'Complete';
          complete.disabled = habit.completed_today;

          const remove = document.createElement('button');
          remove.type = 'button';
          remove.className = 'ghost';
          remove.dataset.action = 'delete';
          remove.textContent = 'Remove';

          actions.append(complete, remove);
          card.append(name, streak, actions);
          return card;
        };

        const taskCard = (task) => {
          const card = document.createElement('div');
          card.className = 'card task';
          card.dataset.name = task.name;

          const name = document.createElement('span');
          name.className = 'card-name';
          name.textContent = task.name;

          const actions = document.createElement('div');
          actions.className = 'card-actions';

          const done = document.createElement('button');
          done.type = 'button';
          done.dataset.action = 'complete';
          done.textContent = 'Done';

          actions.append(done);
          card.append(name, actions);
          return card;
        };

        const renderLists = (data) => {
          habitList.replaceChildren(
            ...(data.habits.length
              ? data.habits.map(habitCard)
              : [emptyNote('No habits yet. Add one above.')])
          );
          taskList.replaceChildren(
            ...(data.tasks.length
              ? data.tasks.map(taskCard)
              : [emptyNote('Nothing pending.')])
          );
        };

        const send = (path, body) =>
          postJson(path, body)
            .then((data) => {
              applyOverview(data);
              renderLists(data);
              setStatus('Saved', 'ok');
            })
            .catch((err) => setStatus(err.message, 'error'));

        habitList.addEventListener('click', (event) => {
          const button = event.target.closest('button[data-action]');
          if (!button || button.disabled) {
            return;
          }
          const name = button.closest('.card').dataset.name;
          const path =
            button.dataset.action === 'complete' ? '/api/habits/complete' : '/api/habits/delete';
          send(path, { name });
        });

        taskList.addEventListener('click', (event) => {
          const button = event.target.closest('button[data-action]');
          if (!button) {
            return;
          }
          send('/api/tasks/complete', { name: button.closest('.card').dataset.name });
        });

        document.getElementById('habit-form').addEventListener('submit', (event) => {
          event.preventDefault();
          const input = document.getElementById('habit-name');
          send('/api/habits', { name: input.value });
          input.value = '';
        });

        document.getElementById('task-form').addEventListener('submit', (event) => {
          event.preventDefault();
          const input = document.getElementById('task-name');
          send('/api/tasks', { name: input.value });
          input.value = '';
        });
      })();
    </script>
"#;

const STATS_SECTION: &str = r#"<section class="stack">
      <div class="panel-grid">
        <div class="stat">
          <span class="label">Total XP</span>
          <span class="value">{{TOTAL_XP}}</span>
        </div>
        <div class="stat">
          <span class="label">Level</span>
          <span class="value">{{LEVEL}}</span>
        </div>
        <div class="stat">
          <span class="label">Habit completions</span>
          <span class="value">{{HABIT_DONE}}</span>
        </div>
        <div class="stat">
          <span class="label">Tasks closed</span>
          <span class="value">{{TASK_DONE}}</span>
        </div>
        <div class="stat">
          <span class="label">Focus sessions</span>
          <span class="value">{{FOCUS_DONE}}</span>
        </div>
      </div>

      <div class="chart-card">
        <h2>Streaks</h2>
        <svg id="streak-chart" viewBox="0 0 600 240" role="img" aria-label="Habit streaks"></svg>
      </div>

      <div class="chart-card">
        <h2>XP earned, last 7 days</h2>
        <svg id="xp-chart" viewBox="0 0 600 180" role="img" aria-label="XP per day"></svg>
      </div>
    </section>

    <script>
      (() => {
        const streakChart = document.getElementById('streak-chart');
        const xpChart = document.getElementById('xp-chart');

        const drawStreaks = (points) => {
          if (!points.length) {
            streakChart.innerHTML =
              '<text x="50%" y="50%" text-anchor="middle">No habits yet</text>';
            return;
          }

          const shown = points.slice(0, 8);
          const width = 600;
          const rowHeight = 28;
          const labelWidth = 150;
          const height = shown.length * rowHeight + 10;
          const max = Math.max(1, ...shown.map((point) => point.streak));
          const scale = (width - labelWidth - 60) / max;

          streakChart.setAttribute('viewBox', '0 0 ' + width + ' ' + height);
          streakChart.innerHTML = shown
            .map((point, index) => {
              const y = index * rowHeight + 8;
              const barWidth = Math.max(2, point.streak * scale);
              const label = point.name.length > 18 ? point.name.slice(0, 17) + '…' : point.name;
              return (
                '<text x="' + (labelWidth - 10) + '" y="' + (y + 12) + '" text-anchor="end">' +
                label.replace(/&/g, '&amp;').replace(/</g, '&lt;') + '</text>' +
                '<rect x="' + labelWidth + '" y="' + y + '" width="' + barWidth +
                '" height="16" rx="3" opacity="' + (point.completed_today ? '1' : '0.55') + '" />' +
                '<text x="' + (labelWidth + barWidth + 8) + '" y="' + (y + 12) + '">' +
                point.streak + '</text>'
              );
            })
            .join('');
        };

        const drawXp = (points) => {
          const width = 600;
          const height = 180;
          const paddingX = 20;
          const paddingY = 26;
          const barGap = 10;
          const barWidth = (width - paddingX * 2 - barGap * (points.length - 1)) / points.length;
          const max = Math.max(1, ...points.map((point) => point.xp));
          const scale = (height - paddingY * 2) / max;

          xpChart.innerHTML = points
            .map((point, index) => {
              const x = paddingX + index * (barWidth + barGap);
              const barHeight = Math.max(1, point.xp * scale);
              const y = height - paddingY - barHeight;
              return (
                '<rect x="' + x + '" y="' + y + '" width="' + barWidth +
                '" height="' + barHeight + '" rx="3" opacity="0.85" />' +
                '<text x="' + (x + barWidth / 2) + '" y="' + (height - 8) +
                '" text-anchor="middle">' + point.date.slice(5) + '</text>' +
                (point.xp > 0
                  ? '<text x="' + (x + barWidth / 2) + '" y="' + (y - 6) +
                    '" text-anchor="middle">' + point.xp + '</text>'
                  : '')
              );
            })
            .join('');
        };

        fetch('/api/stats')
          .then((res) => {
            if (!res.ok) {
              throw new Error('Unable to load stats');
            }
            return res.json();
          })
          .then((stats) => {
            drawStreaks(stats.streaks);
            drawXp(stats.last_7_days);
          })
          .catch((err) => setStatus(err.message, 'error'));
      })();
    </script>
"#;

const FOCUS_SECTION: &str = r#"<section class="stack focus">
      <p class="header-tag">Deep focus</p>

      <div class="focus-setup" id="focus-setup">
        <label for="minutes">Session length: <span id="minutes-label">25</span> min</label>
        <input type="range" id="minutes" min="5" max="120" step="5" value="25" />
        <button id="focus-start" type="button">Start session</button>
      </div>

      <div class="focus-run" id="focus-run" hidden>
        <div id="countdown" class="countdown">25:00</div>
        <div class="xp-bar"><div id="focus-progress" class="xp-progress" style="width: 0%"></div></div>
        <button id="focus-cancel" type="button" class="ghost">Abandon (no credit)</button>
      </div>

      <p class="hint">Sessions completed so far: {{SESSIONS}}. Leaving early awards nothing.</p>
    </section>

    <script>
      (() => {
        const setup = document.getElementById('focus-setup');
        const run = document.getElementById('focus-run');
        const slider = document.getElementById('minutes');
        const sliderLabel = document.getElementById('minutes-label');
        const countdownEl = document.getElementById('countdown');
        const progressEl = document.getElementById('focus-progress');

        let timer = null;

        const format = (seconds) => {
          const mm = String(Math.floor(seconds / 60)).padStart(2, '0');
          const ss = String(seconds % 60).padStart(2, '0');
          return mm + ':' + ss;
        };

        const stop = () => {
          clearInterval(timer);
          timer = null;
          run.hidden = true;
          setup.hidden = false;
        };

        slider.addEventListener('input', () => {
          sliderLabel.textContent = slider.value;
        });

        document.getElementById('focus-start').addEventListener('click', () => {
          const minutes = Number(slider.value);
          const total = minutes * 60;
          let remaining = total;

          setup.hidden = true;
          run.hidden = false;
          countdownEl.textContent = format(remaining);
          progressEl.style.width = '0%';

          timer = setInterval(() => {
            remaining -= 1;
            countdownEl.textContent = format(Math.max(0, remaining));
            progressEl.style.width = (((total - remaining) / total) * 100).toFixed(1) + '%';

            if (remaining <= 0) {
              stop();
              postJson('/api/focus/complete', { minutes })
                .then((data) => {
                  applyOverview(data);
                  setStatus('Session complete. XP awarded.', 'ok');
                })
                .catch((err) => setStatus(err.message, 'error'));
            }
          }, 1000);
        });

        document.getElementById('focus-cancel').addEventListener('click', () => {
          stop();
          setStatus('Session abandoned. No credit.', '');
        });
      })();
    </script>
"#;

const DEV_PANEL_HTML: &str = r#"<section class="dev-panel">
      <p class="header-tag">Developer</p>
      <p class="hint">Page registry (fixed set, selected by the <code>page</code> query key):</p>
      <ul class="registry">{{REGISTRY}}</ul>
      <div class="dev-actions">
        <a class="button-link" href="/api/export">Export state JSON</a>
        <button id="reset-btn" class="danger" type="button">Reset everything</button>
      </div>
    </section>
"#;
