/// Embedded web assets for the graph visualization

/// Replaced by the serialized graph in exported pages; `null` when served.
pub const DATA_PLACEHOLDER: &str = "/*__TOPICMAP_DATA__*/null";

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Topicmap - Survey Topics</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #10201a;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            background: #0b1612;
        }

        #sidebar {
            width: 340px;
            background: #10201a;
            border-left: 1px solid #2b3d35;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #5cff5c;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #88a396;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #2b3d35;
        }

        .stat-value {
            color: #5cff5c;
            font-weight: bold;
        }

        #search {
            width: 100%;
            padding: 8px 10px;
            border-radius: 6px;
            border: 1px solid #2b3d35;
            background: #0b1612;
            color: #eee;
            font-size: 0.95em;
        }

        #search-count {
            margin-top: 6px;
            font-size: 0.85em;
            color: #88a396;
        }

        #node-info {
            display: none;
            margin-top: 20px;
            padding: 15px;
            background: #0b1612;
            border-radius: 8px;
        }

        #node-info.visible {
            display: block;
        }

        #node-info h3 {
            color: #5cff5c;
            margin-bottom: 8px;
        }

        .node-meta {
            font-size: 0.85em;
            color: #88a396;
            margin-bottom: 10px;
        }

        .question {
            margin-top: 12px;
            font-size: 0.9em;
            font-weight: bold;
        }

        .option {
            display: grid;
            grid-template-columns: 18px 1fr 48px;
            gap: 6px;
            align-items: center;
            margin-top: 6px;
            font-size: 0.85em;
        }

        .option .bar {
            height: 8px;
            border-radius: 4px;
            background: #77bb99;
        }

        .option.top .bar {
            background: #04bd61;
        }

        .legend {
            display: flex;
            flex-direction: column;
            gap: 6px;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 8px;
            font-size: 0.85em;
        }

        .legend-color {
            width: 12px;
            height: 12px;
            border-radius: 50%;
        }

        /* SVG styles */
        .node {
            cursor: pointer;
        }

        .node circle {
            stroke: #0b1612;
            stroke-width: 1.5px;
        }

        .node.highlighted circle {
            stroke: #5cff5c;
            stroke-width: 3px;
        }

        .link {
            stroke: #6d8a7c;
            stroke-opacity: 0.6;
        }

        .cluster-label {
            fill: #fff;
            paint-order: stroke;
            stroke: #0b1612;
            stroke-width: 4px;
            text-anchor: middle;
            dominant-baseline: middle;
            pointer-events: none;
        }

        .tooltip {
            position: absolute;
            background: rgba(0, 0, 0, 0.9);
            color: #fff;
            padding: 10px;
            border-radius: 6px;
            font-size: 12px;
            pointer-events: none;
            max-width: 280px;
            z-index: 1000;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
        <div id="sidebar">
            <h1>Topicmap</h1>
            <div id="title"></div>

            <h2>Search</h2>
            <input id="search" type="search" placeholder="Whole word, e.g. loan">
            <div id="search-count"></div>

            <h2>Summary</h2>
            <div id="stats">
                <div class="stat">
                    <span>Topics</span>
                    <span class="stat-value" id="stat-nodes">-</span>
                </div>
                <div class="stat">
                    <span>Links</span>
                    <span class="stat-value" id="stat-links">-</span>
                </div>
                <div class="stat">
                    <span>Clusters</span>
                    <span class="stat-value" id="stat-clusters">-</span>
                </div>
                <div class="stat">
                    <span>Components</span>
                    <span class="stat-value" id="stat-components">-</span>
                </div>
            </div>

            <h2>Legend</h2>
            <div class="legend">
                <div class="legend-item">
                    <div class="legend-color" style="background: #ffffff"></div>
                    <span>Split answers</span>
                </div>
                <div class="legend-item">
                    <div class="legend-color" style="background: #5cff5c"></div>
                    <span>One dominant answer</span>
                </div>
                <div class="legend-item">
                    <div class="legend-color" style="background: #c4ecd8"></div>
                    <span>No response data</span>
                </div>
            </div>

            <div id="node-info"></div>
        </div>
    </div>

    <div class="tooltip" style="display: none;"></div>

    <script>
        const EMBEDDED = /*__TOPICMAP_DATA__*/null;
        const STATIC = EMBEDDED !== null;

        let simulation, svg, g, link, node, labelLayer;
        let graphData;
        let zoomScale = 1;
        let searchTimer = null;
        // Only the newest response of each kind is applied
        let labelRequest = 0;
        let viewRequest = 0;

        async function init() {
            if (STATIC) {
                graphData = EMBEDDED;
            } else {
                const response = await fetch('/api/graph');
                graphData = await response.json();
            }

            document.getElementById('title').textContent = graphData.metadata.title;
            document.getElementById('stat-nodes').textContent = graphData.metadata.total_nodes;
            document.getElementById('stat-links').textContent = graphData.metadata.total_links;
            document.getElementById('stat-clusters').textContent = graphData.metadata.labelled_clusters;
            document.getElementById('stat-components').textContent = graphData.metadata.components;

            createGraph();
            setupSearch();
        }

        function createGraph() {
            const container = document.getElementById('graph');
            const width = container.clientWidth;
            const height = container.clientHeight;

            svg = d3.select('#graph')
                .append('svg')
                .attr('width', width)
                .attr('height', height);

            const zoom = d3.zoom()
                .scaleExtent([0.1, 4])
                .on('zoom', (event) => {
                    g.attr('transform', event.transform);
                    zoomScale = event.transform.k;
                })
                .on('end', () => refreshLabels());

            svg.call(zoom);
            svg.on('click', () => applyView(emptyView()));

            g = svg.append('g');

            const links = graphData.links.map(l => Object.assign({}, l));

            link = g.append('g')
                .selectAll('line')
                .data(links)
                .enter()
                .append('line')
                .attr('class', 'link')
                .style('stroke-width', d => d.strength * 2);

            node = g.append('g')
                .selectAll('.node')
                .data(graphData.nodes)
                .enter()
                .append('g')
                .attr('class', 'node')
                .call(d3.drag()
                    .on('start', dragstarted)
                    .on('drag', dragged)
                    .on('end', dragended));

            node.append('circle')
                .attr('r', d => d.radius)
                .attr('fill', d => d.color);

            labelLayer = g.append('g');

            const tooltip = d3.select('.tooltip');

            node.on('mouseover', function(event, d) {
                tooltip.style('display', 'block')
                    .html(`<strong>${escapeHtml(d.id)}</strong><br>
                           ${escapeHtml(d.topic || '')}<br>
                           ${d.sample_size != null ? d.sample_size + ' responses' : ''}`)
                    .style('left', (event.pageX + 10) + 'px')
                    .style('top', (event.pageY - 10) + 'px');
            })
            .on('mouseout', function() {
                tooltip.style('display', 'none');
            })
            .on('click', function(event, d) {
                event.stopPropagation();
                selectNode(d);
            });

            simulation = d3.forceSimulation(graphData.nodes)
                .force('link', d3.forceLink(links)
                    .id(d => d.id)
                    .strength(d => d.strength * 0.08))
                .force('charge', d3.forceManyBody().strength(-200))
                .force('center', d3.forceCenter(width / 2, height / 2).strength(0.12))
                .force('collision', d3.forceCollide().radius(d => d.radius + 2).strength(1))
                .force('x', d3.forceX(width / 2).strength(0.08))
                .force('y', d3.forceY(height / 2).strength(0.08))
                .on('tick', ticked)
                .on('end', () => refreshLabels());
        }

        function ticked() {
            link
                .attr('x1', d => d.source.x)
                .attr('y1', d => d.source.y)
                .attr('x2', d => d.target.x)
                .attr('y2', d => d.target.y);

            node.attr('transform', d => `translate(${d.x},${d.y})`);
        }

        function dragstarted(event) {
            if (!event.active) simulation.alphaTarget(0.3).restart();
            event.subject.fx = event.subject.x;
            event.subject.fy = event.subject.y;
        }

        function dragged(event) {
            event.subject.fx = event.x;
            event.subject.fy = event.y;
        }

        function dragended(event) {
            if (!event.active) simulation.alphaTarget(0);
            event.subject.fx = null;
            event.subject.fy = null;
        }

        // Cluster labels

        async function refreshLabels() {
            const request = ++labelRequest;
            const positions = {};
            graphData.nodes.forEach(n => {
                if (Number.isFinite(n.x) && Number.isFinite(n.y)) positions[n.id] = [n.x, n.y];
            });

            let result;
            if (STATIC) {
                result = localPlacements(positions, zoomScale);
            } else {
                const response = await fetch('/api/placements', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ positions, zoom: zoomScale }),
                });
                result = await response.json();
            }
            if (request !== labelRequest) return;
            drawLabels(result);
        }

        function drawLabels(result) {
            const style = result.style;
            labelLayer.selectAll('text')
                .data(result.placements, d => d.cluster_id)
                .join('text')
                .attr('class', 'cluster-label')
                .attr('x', d => d.x)
                .attr('y', d => d.y)
                .style('font-size', d => d.font_size + 'px')
                .style('font-weight', style.font_weight)
                .style('opacity', style.opacity)
                .text(d => d.text);
        }

        function zoomStyle(k) {
            return {
                visible: k >= 0.2,
                font_size: k > 0 ? Math.min(20, Math.max(12, 16 / k)) : 20,
                opacity: k < 0.5 ? Math.max(0, k * 2) : 1,
                font_weight: k < 0.7 ? 700 : 900,
            };
        }

        // Exported pages have no server; skip-on-overlap only
        function localPlacements(positions, k) {
            const style = zoomStyle(k);
            if (!style.visible) return { style, placements: [] };

            const m = graphData.label_metrics;
            const scale = style.font_size / m.base_font_size;
            const candidates = [];
            graphData.clusters.forEach(c => {
                if (!c.label) return;
                const pts = c.members.map(id => positions[id]).filter(p => p);
                if (!pts.length) return;
                const x = pts.reduce((s, p) => s + p[0], 0) / pts.length;
                const y = pts.reduce((s, p) => s + p[1], 0) / pts.length;
                candidates.push({ cluster_id: c.id, text: c.label, size: c.members.length, x, y });
            });
            candidates.sort((a, b) => b.size - a.size);

            const placements = [];
            candidates.forEach(c => {
                const w = [...c.text].length * m.char_width * scale + 2 * m.padding;
                const h = m.line_height * scale;
                const rect = { left: c.x - w / 2, right: c.x + w / 2, top: c.y - h / 2, bottom: c.y + h / 2 };
                const clash = placements.some(p =>
                    !(rect.right <= p.rect.left || rect.left >= p.rect.right ||
                      rect.bottom <= p.rect.top || rect.top >= p.rect.bottom));
                if (!clash) placements.push({ cluster_id: c.cluster_id, text: c.text, x: c.x, y: c.y, font_size: style.font_size, rect });
            });
            return { style, placements };
        }

        // Selection and search

        function emptyView() {
            return { selected: null, query: null, highlighted: [], active_links: [] };
        }

        function applyView(view) {
            const filtering = view.selected !== null || view.query !== null;
            const hit = new Set(view.highlighted);
            const active = new Set(view.active_links);

            node.classed('highlighted', d => filtering && hit.has(d.id))
                .style('opacity', d => !filtering || hit.has(d.id) ? 1 : 0.2);
            link.style('stroke-opacity', (d, i) => !filtering ? 0.6 : (active.has(i) ? 0.8 : 0.05));

            const count = document.getElementById('search-count');
            count.textContent = view.query !== null ? `${view.highlighted.length} matching topics` : '';
            if (view.selected === null) {
                document.getElementById('node-info').classList.remove('visible');
            }
        }

        async function selectNode(d) {
            const request = ++viewRequest;
            let view;
            if (STATIC) {
                const hit = new Set([d.id]);
                const active = [];
                graphData.links.forEach((l, i) => {
                    if (l.source === d.id || l.target === d.id) {
                        hit.add(l.source);
                        hit.add(l.target);
                        active.push(i);
                    }
                });
                view = { selected: d.id, query: null, active_links: active,
                         highlighted: graphData.nodes.filter(n => hit.has(n.id)).map(n => n.id) };
            } else {
                const response = await fetch('/api/select?id=' + encodeURIComponent(d.id));
                view = await response.json();
            }
            if (request !== viewRequest) return;
            document.getElementById('search').value = '';
            applyView(view);
            showNodeInfo(d);
        }

        function setupSearch() {
            document.getElementById('search').addEventListener('input', function() {
                clearTimeout(searchTimer);
                const term = this.value;
                searchTimer = setTimeout(() => runSearch(term), 200);
            });
        }

        async function runSearch(term) {
            const request = ++viewRequest;
            if (STATIC) {
                applyView(localSearch(term));
                return;
            }
            const response = await fetch('/api/search?q=' + encodeURIComponent(term));
            const view = await response.json();
            if (request !== viewRequest) return;
            applyView(view);
        }

        function wordPattern(term) {
            const escaped = term.replace(/[.*+?^${}()|[\]\\]/g, '\\$&');
            return new RegExp(`(^|[^\\p{L}\\p{N}_])${escaped}($|[^\\p{L}\\p{N}_])`, 'iu');
        }

        function localSearch(raw) {
            const term = raw.trim();
            if (!term) return emptyView();
            const pattern = wordPattern(term);
            const hit = new Set(graphData.nodes.filter(n =>
                pattern.test(n.id) ||
                n.questions.some(q => pattern.test(q.text) || q.responses.some(r => pattern.test(r.option)))
            ).map(n => n.id));
            const active = [];
            graphData.links.forEach((l, i) => {
                if (hit.has(l.source) || hit.has(l.target)) active.push(i);
            });
            return { selected: null, query: term, active_links: active,
                     highlighted: graphData.nodes.filter(n => hit.has(n.id)).map(n => n.id) };
        }

        function showNodeInfo(d) {
            const info = document.getElementById('node-info');
            const meta = [d.survey_name, d.topic, d.sample_size != null ? d.sample_size + ' responses' : null]
                .filter(x => x)
                .map(escapeHtml)
                .join(' · ');

            let html = `<h3>${escapeHtml(d.id)}</h3><div class="node-meta">${meta}</div>`;
            d.questions.forEach(q => {
                const top = Math.max(...q.responses.map(r => r.share));
                html += `<div class="question">${escapeHtml(q.text)}</div>`;
                q.responses.forEach((r, i) => {
                    const letter = String.fromCharCode(97 + i);
                    const pct = (r.share * 100).toFixed(1);
                    html += `<div class="option${r.share === top && top > 0 ? ' top' : ''}">
                                <span>${letter}</span>
                                <div><div>${escapeHtml(r.option)}</div><div class="bar" style="width:${pct}%"></div></div>
                                <span>${pct}%</span>
                             </div>`;
                });
            });
            info.innerHTML = html;
            info.classList.add('visible');
        }

        function escapeHtml(s) {
            return String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));
        }

        window.addEventListener('resize', () => {
            const container = document.getElementById('graph');
            svg.attr('width', container.clientWidth).attr('height', container.clientHeight);
            simulation.force('center', d3.forceCenter(container.clientWidth / 2, container.clientHeight / 2));
            simulation.alpha(0.3).restart();
        });

        init();
    </script>
</body>
</html>
"#;
