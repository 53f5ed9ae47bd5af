//! Embedded static assets for the upload UI.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>migramap — village address mapper</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<main>
  <h1>migramap</h1>
  <p>Upload a CSV with <code>Full_Location</code>, <code>Type</code>,
     <code>Families</code>, <code>Village</code> and optional
     <code>Label</code> columns. Each row is geocoded in turn, so large
     files take a while.</p>
  <form id="upload-form">
    <input type="file" id="file" accept=".csv,text/csv" required>
    <button type="submit" id="submit">Geocode &amp; map</button>
  </form>
  <section id="status" hidden></section>
  <section id="stats" hidden>
    <h2>Results</h2>
    <ul>
      <li>Exact: <span id="stat-success"></span></li>
      <li>Approximate: <span id="stat-partial"></span></li>
      <li>Failed: <span id="stat-failed"></span></li>
    </ul>
    <ul id="failed-list"></ul>
  </section>
  <iframe id="map-frame" hidden></iframe>
</main>
<script src="/app.js"></script>
</body>
</html>
"#;

pub const STYLE_CSS: &str = r#"body {
  font-family: system-ui, sans-serif;
  margin: 0;
  background: #f5f3ee;
  color: #222;
}
main {
  max-width: 860px;
  margin: 2rem auto;
  padding: 0 1rem;
}
h1 { margin-bottom: 0.25rem; }
form { margin: 1rem 0; }
button {
  padding: 0.4rem 1rem;
  border: none;
  border-radius: 4px;
  background: #b34700;
  color: white;
  cursor: pointer;
}
button:disabled { background: #999; cursor: wait; }
#status { color: #555; margin: 0.5rem 0; }
#failed-list { color: #a33; }
#map-frame {
  width: 100%;
  height: 520px;
  border: 1px solid #ccc;
  border-radius: 4px;
}
"#;

pub const APP_JS: &str = r#"const form = document.getElementById('upload-form');
const statusBox = document.getElementById('status');
const statsBox = document.getElementById('stats');
const mapFrame = document.getElementById('map-frame');
const submit = document.getElementById('submit');

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const file = document.getElementById('file').files[0];
  if (!file) return;

  submit.disabled = true;
  statsBox.hidden = true;
  mapFrame.hidden = true;
  statusBox.hidden = false;
  statusBox.textContent = 'Geocoding… one row every half second, please wait.';

  try {
    const body = await file.text();
    const response = await fetch('/api/batch', {
      method: 'POST',
      headers: { 'Content-Type': 'text/csv' },
      body,
    });
    const result = await response.json();
    if (!response.ok) {
      statusBox.textContent = 'Error: ' + (result.error || response.statusText);
      return;
    }

    statusBox.hidden = true;
    statsBox.hidden = false;
    document.getElementById('stat-success').textContent = result.success;
    document.getElementById('stat-partial').textContent = result.partial;
    document.getElementById('stat-failed').textContent = result.failed;

    const failedList = document.getElementById('failed-list');
    failedList.replaceChildren();
    for (const entry of result.failed_list) {
      const li = document.createElement('li');
      li.textContent = entry;
      failedList.appendChild(li);
    }

    mapFrame.src = result.map + '?t=' + Date.now();
    mapFrame.hidden = false;
  } catch (err) {
    statusBox.textContent = 'Error: ' + err;
  } finally {
    submit.disabled = false;
  }
});
"#;
