use axum::{
    http::header,
    response::{Html, IntoResponse},
};

/// Serve the embedded single-page dashboard. The page is static; all data
/// arrives through `GET /dashboard`, so it is safe to cache briefly.
pub async fn index() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Gym Environment Dashboard</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.min.css">
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --error-bg: #fef2f2;
            --error-border: #fecaca;
            --error-text: #b91c1c;
            --advisory-bg: #fffbeb;
            --advisory-border: #fde68a;
            --advisory-text: #92400e;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .container { max-width: 960px; margin: 0 auto; padding: 1.5rem; }

        header {
            display: flex;
            justify-content: space-between;
            align-items: baseline;
            margin-bottom: 1rem;
            flex-wrap: wrap;
            gap: 0.5rem;
        }
        h1 { font-size: 1.25rem; font-weight: 600; }
        .clock { font-size: 0.875rem; color: var(--muted); }
        .busy-dot {
            display: inline-block;
            width: 0.5rem;
            height: 0.5rem;
            border-radius: 50%;
            background: var(--border);
            margin-left: 0.375rem;
        }
        .busy-dot.on { background: var(--accent); }

        .banner {
            border: 1px solid;
            border-radius: 0.5rem;
            padding: 0.75rem 1rem;
            margin-bottom: 1rem;
            display: flex;
            justify-content: space-between;
            align-items: center;
            gap: 1rem;
            font-size: 0.875rem;
            flex-wrap: wrap;
        }
        .banner.error { background: var(--error-bg); border-color: var(--error-border); color: var(--error-text); }
        .banner.advisory { background: var(--advisory-bg); border-color: var(--advisory-border); color: var(--advisory-text); }
        .banner .actions { display: flex; gap: 0.75rem; align-items: center; }
        .banner a { color: inherit; }
        .banner button {
            padding: 0.375rem 0.875rem;
            border: 1px solid currentColor;
            border-radius: 0.375rem;
            background: transparent;
            color: inherit;
            font-size: 0.8125rem;
            cursor: pointer;
        }
        .banner button:disabled { opacity: 0.5; cursor: wait; }

        .cards {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(10rem, 1fr));
            gap: 1rem;
            margin-bottom: 1rem;
        }
        .card {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
        }
        .card .label { font-size: 0.75rem; color: var(--muted); text-transform: uppercase; letter-spacing: 0.05em; }
        .card .value { font-size: 1.5rem; font-weight: 600; margin-top: 0.25rem; }

        .panel {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }
        .panel h2 { font-size: 0.875rem; font-weight: 600; margin-bottom: 0.75rem; }

        .schedule { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
        .day h3 { font-size: 0.8125rem; color: var(--muted); margin-bottom: 0.5rem; }
        .slot {
            display: flex;
            justify-content: space-between;
            font-size: 0.8125rem;
            padding: 0.375rem 0.5rem;
            border-radius: 0.25rem;
            margin-bottom: 0.25rem;
            background: var(--bg);
        }
        .slot.active { background: #dcfce7; color: #166534; font-weight: 600; }

        footer { font-size: 0.75rem; color: var(--muted); text-align: right; }
    </style>
</head>
<body>
<div class="container">
    <header>
        <h1>Gym Environment Dashboard</h1>
        <div class="clock"><span id="clock">--</span><span id="busy" class="busy-dot"></span></div>
    </header>

    <div id="banner" class="banner" hidden>
        <span id="banner-text"></span>
        <span class="actions">
            <a id="feed-link" href="#" target="_blank" rel="noopener">data source</a>
            <button id="retry">Retry</button>
        </span>
    </div>

    <div class="cards">
        <div class="card"><div class="label">Temperature</div><div id="temperature" class="value">--</div></div>
        <div class="card"><div class="label">Humidity</div><div id="humidity" class="value">--</div></div>
        <div class="card"><div class="label">Illuminance</div><div id="illuminance" class="value">--</div></div>
        <div class="card"><div class="label">Occupancy</div><div id="motion" class="value">--</div></div>
    </div>

    <div class="panel">
        <h2>Last 72 hours</h2>
        <div id="chart"></div>
    </div>

    <div class="panel">
        <h2>Reservations</h2>
        <div id="schedule" class="schedule"></div>
    </div>

    <footer id="updated">Waiting for first data cycle</footer>
</div>

<script src="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.iife.min.js"></script>
<script>
const api = url => fetch(url).then(r => r.json());

const state = { chart: null };

function fmtClock(iso) {
    return new Date(iso).toLocaleString([], { dateStyle: 'medium', timeStyle: 'short' });
}

function setCard(id, text) {
    document.getElementById(id).textContent = text;
}

function drawChart(points) {
    const data = [
        points.map(p => Date.parse(p.timestamp) / 1000),
        points.map(p => p.temperature),
        points.map(p => p.humidity),
    ];
    if (state.chart) {
        state.chart.setData(data);
        return;
    }
    const el = document.getElementById('chart');
    state.chart = new uPlot({
        width: el.clientWidth,
        height: 260,
        series: [
            {},
            { label: 'Temperature (°C)', stroke: '#dc2626', width: 2 },
            { label: 'Humidity (%)', stroke: '#2563eb', width: 2, scale: '%' },
        ],
        axes: [
            {},
            {},
            { scale: '%', side: 1, grid: { show: false } },
        ],
        scales: { '%': { range: [0, 100] } },
    }, data, el);
}

function drawSchedule(days) {
    document.getElementById('schedule').innerHTML = days.map(day => `
        <div class="day">
            <h3>${day.date} (${day.day_of_week})</h3>
            ${day.slots.map(s => `
                <div class="slot ${s.status}"><span>${s.time}</span><span>${s.user}</span></div>
            `).join('')}
        </div>
    `).join('');
}

function render(d) {
    document.getElementById('clock').textContent = fmtClock(d.clock);
    document.getElementById('busy').classList.toggle('on', d.busy);

    const banner = document.getElementById('banner');
    if (d.note) {
        banner.className = 'banner ' + d.note.kind;
        document.getElementById('banner-text').textContent = d.note.text;
        document.getElementById('feed-link').href = d.feed_url;
        banner.hidden = false;
    } else {
        banner.hidden = true;
    }

    const cur = d.current;
    setCard('temperature', cur ? cur.temperature.toFixed(1) + ' °C' : '--');
    setCard('humidity', cur ? cur.humidity + ' %' : '--');
    setCard('illuminance', cur ? cur.illuminance + ' lx' : '--');
    setCard('motion', cur ? (cur.motion ? 'In use' : 'Vacant') : '--');

    drawChart(d.chart);
    drawSchedule(d.schedule);

    document.getElementById('updated').textContent = d.last_updated
        ? 'Updated ' + fmtClock(d.last_updated) + (d.source === 'sample' ? ' · sample data' : '')
        : 'Waiting for first data cycle';
}

async function load() {
    try {
        render(await api('/dashboard'));
    } catch (e) {
        console.error('dashboard fetch failed', e);
    }
}

async function retry() {
    const btn = document.getElementById('retry');
    btn.disabled = true;
    try {
        const r = await fetch('/refresh', { method: 'POST' }).then(r => r.json());
        render(r.dashboard);
    } catch (e) {
        console.error('refresh failed', e);
    } finally {
        btn.disabled = false;
    }
}

document.getElementById('retry').addEventListener('click', retry);
window.addEventListener('resize', () => {
    if (state.chart) {
        state.chart.setSize({ width: document.getElementById('chart').clientWidth, height: 260 });
    }
});

load();
setInterval(load, 60000);
</script>
</body>
</html>
"##;
