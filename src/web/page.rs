//! The prediction page. Widgets are built client-side from `/api/schema`.

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Employee Salary Prediction</title>
<style>
  * { box-sizing: border-box; }
  body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; color: #262730; display: flex; min-height: 100vh; }
  aside { width: 320px; background: #f0f2f6; padding: 1.5rem 1.25rem; overflow-y: auto; }
  main { flex: 1; max-width: 760px; margin: 0 auto; padding: 2rem 1.5rem; }
  h1 { font-size: 2rem; margin-top: 0; }
  h2 { font-size: 1.2rem; }
  label { display: block; font-size: .85rem; margin: 1rem 0 .3rem; }
  input[type=number], select { width: 100%; padding: .4rem; border: 1px solid #ccc; border-radius: 4px; }
  input[type=range] { width: 80%; }
  .value { display: inline-block; width: 18%; text-align: right; font-weight: 600; }
  .radio label { display: inline; margin-right: 1rem; }
  button, .download { background: #ff4b4b; color: #fff; border: 0; border-radius: 4px; padding: .55rem 1rem; cursor: pointer; text-decoration: none; display: inline-block; }
  table { border-collapse: collapse; font-size: .8rem; margin: .5rem 0; display: block; overflow-x: auto; }
  th, td { border: 1px solid #e0e0e0; padding: .3rem .5rem; white-space: nowrap; }
  th { background: #fafafa; }
  .success { background: #d4edda; color: #155724; padding: .8rem 1rem; border-radius: 4px; margin-top: 1rem; }
  .error { background: #f8d7da; color: #721c24; padding: .8rem 1rem; border-radius: 4px; margin-top: 1rem; white-space: pre-wrap; }
  hr { margin: 2rem 0; border: 0; border-top: 1px solid #ddd; }
</style>
</head>
<body>
<aside>
  <h2>Input Employee Details</h2>
  <form id="fields"></form>
</aside>
<main>
  <h1>💵 Employee Salary Prediction App</h1>
  <p>Predict whether an employee earns &gt;50K or ≤50K based on input features.</p>

  <h3>Input Data</h3>
  <div id="input-preview"></div>
  <button id="predict" type="button">Predict Salary class</button>
  <div id="result"></div>

  <hr>
  <h3>Batch Prediction</h3>
  <p>Upload a CSV file for batch prediction</p>
  <input id="upload" type="file" accept=".csv,text/csv">
  <div id="batch"></div>
</main>
<script>
const form = document.getElementById("fields");
let fields = [];

function el(tag, attrs, text) {
  const node = document.createElement(tag);
  Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
  if (text !== undefined) node.textContent = text;
  return node;
}

function renderTable(table) {
  const t = el("table");
  const head = el("tr");
  table.columns.forEach(c => head.appendChild(el("th", {}, c)));
  t.appendChild(head);
  table.rows.forEach(row => {
    const tr = el("tr");
    row.forEach(v => tr.appendChild(el("td", {}, v)));
    t.appendChild(tr);
  });
  return t;
}

function buildField(f) {
  const wrap = el("div");
  wrap.appendChild(el("label", { for: f.name }, f.label));
  if (f.widget === "slider") {
    const input = el("input", { type: "range", id: f.name, name: f.name, min: f.min, max: f.max, value: f.default });
    const shown = el("span", { class: "value" }, String(f.default));
    input.addEventListener("input", () => { shown.textContent = input.value; });
    wrap.append(input, shown);
  } else if (f.widget === "number") {
    wrap.appendChild(el("input", { type: "number", id: f.name, name: f.name, min: f.min, max: f.max, value: f.default, step: 1 }));
  } else if (f.widget === "select") {
    const select = el("select", { id: f.name, name: f.name });
    f.options.forEach(o => {
      const opt = el("option", { value: o }, o);
      if (o === f.default) opt.selected = true;
      select.appendChild(opt);
    });
    wrap.appendChild(select);
  } else {
    const group = el("div", { class: "radio" });
    f.options.forEach(o => {
      const input = el("input", { type: "radio", name: f.name, value: o });
      if (o === f.default) input.checked = true;
      const label = el("label");
      label.append(input, " " + o);
      group.appendChild(label);
    });
    wrap.appendChild(group);
  }
  return wrap;
}

function currentRecord() {
  const data = new FormData(form);
  const record = {};
  fields.forEach(f => {
    const v = data.get(f.name);
    record[f.name] = (f.widget === "slider" || f.widget === "number") ? Number(v) : v;
  });
  return record;
}

function refreshPreview() {
  const record = currentRecord();
  const preview = document.getElementById("input-preview");
  preview.replaceChildren(renderTable({ columns: Object.keys(record), rows: [Object.values(record).map(String)] }));
}

async function errorText(res) {
  try { return (await res.json()).error; } catch (_) { return res.statusText; }
}

document.getElementById("predict").addEventListener("click", async () => {
  const out = document.getElementById("result");
  const res = await fetch("/api/predict", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(currentRecord()),
  });
  if (!res.ok) {
    out.replaceChildren(el("div", { class: "error" }, await errorText(res)));
    return;
  }
  const body = await res.json();
  out.replaceChildren(el("div", { class: "success" }, "Predicted Salary Category: " + body.bracket));
});

document.getElementById("upload").addEventListener("change", async (event) => {
  const out = document.getElementById("batch");
  const file = event.target.files[0];
  if (!file) return;
  const data = new FormData();
  data.append("file", file);
  const res = await fetch("/api/batch", { method: "POST", body: data });
  if (!res.ok) {
    out.replaceChildren(el("div", { class: "error" }, await errorText(res)));
    return;
  }
  const body = await res.json();
  const link = el("a", { class: "download", download: body.file_name }, "Download Predictions CSV");
  link.href = URL.createObjectURL(new Blob([body.csv], { type: "text/csv;charset=utf-8" }));
  out.replaceChildren(
    el("p", {}, "Uploaded data preview:"), renderTable(body.input_preview),
    el("p", {}, "Predictions:"), renderTable(body.output_preview),
    link
  );
});

fetch("/api/schema").then(r => r.json()).then(schema => {
  fields = schema;
  schema.forEach(f => form.appendChild(buildField(f)));
  form.addEventListener("input", refreshPreview);
  form.addEventListener("change", refreshPreview);
  refreshPreview();
});
</script>
</body>
</html>
"##;
