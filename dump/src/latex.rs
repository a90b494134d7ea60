//! The standalone LaTeX document around diagram output.

/// Document preamble loading everything the forest and TikZ backends use.
pub fn header() -> &'static str {
    concat!(
        "\\documentclass{minimal}\n",
        "\\usepackage{luatex85}\n",
        "\\usepackage[T1]{fontenc}\n",
        "\\usepackage[utf8]{inputenc}\n",
        "\\usepackage{textcomp}\n",
        "\\usepackage{color}\n",
        "\\usepackage{listings}\n",
        "\\usepackage{tikz}\n",
        "\\usetikzlibrary{graphdrawing,graphs,shapes}\n",
        "\\usegdlibrary{layered}\n",
        "\\usepackage{forest}\n",
        "\\usepackage[active,tightpage]{preview}\n",
        "\\PreviewEnvironment{lstlisting}\n",
        "\\PreviewEnvironment{tikzpicture}\n",
        "\\PreviewEnvironment{forest}\n",
        "\\usepackage[numbered]{bookmark}\n",
        "\\begin{document}\n",
    )
}

/// Closes the document opened by [`header`].
pub fn footer() -> &'static str {
    "\\end{document}\n"
}

/// Wraps diagram output into a complete document.
pub fn document(body: &str) -> String {
    let mut out = String::with_capacity(header().len() + body.len() + footer().len());
    out.push_str(header());
    out.push_str(body);
    out.push_str(footer());
    out
}
