use crate::model::{Mcq, McqOption};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marcador de bloque: una "Q" seguida de uno o más dígitos y un punto
/// (`Q1.`, `Q2.`, ...). Todo lo que hay entre dos marcadores es un bloque.
static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Q\d+\.").expect("regex válida"));

const OPTION_PREFIXES: [&str; 4] = ["A.", "B.", "C.", "D."];

/// Convierte la transcripción cruda de la IA en una secuencia ordenada
/// de MCQs. Función pura: re-parsear el mismo texto da el mismo
/// resultado.
///
/// El formato es un convenio informal con el proveedor de contenido, así
/// que cualquier desviación degrada en silencio: una transcripción vacía
/// o sin marcadores `Qn.` devuelve una lista vacía, y un bloque sin
/// líneas de opción produce un MCQ con opciones vacías. Nunca un error.
pub fn parse_mcqs(transcript: &str) -> Vec<Mcq> {
    // Sin ningún marcador no hay quiz: texto malformado o mensaje de
    // error del proveedor. Se devuelve vacío, no se inventa un bloque.
    if !QUESTION_MARKER.is_match(transcript) {
        return Vec::new();
    }

    QUESTION_MARKER
        .split(transcript)
        .filter(|block| !block.trim().is_empty())
        .map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Mcq {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    // La primera línea es el enunciado; el resto se clasifica por prefijo.
    let question = lines.first().copied().unwrap_or_default().to_string();

    let options = lines
        .iter()
        .filter(|line| OPTION_PREFIXES.iter().any(|p| line.starts_with(p)))
        .filter_map(|line| {
            line.chars().next().map(|letter| McqOption {
                letter,
                text: (*line).to_string(),
            })
        })
        .collect();

    // Solo cuenta la primera línea `Answer:` / `Explanation:` de cada
    // bloque. Que la letra corresponda a una opción existente es
    // responsabilidad del consumidor, no del parser.
    let correct = lines
        .iter()
        .find(|line| starts_with_ignore_case(line, "Answer:"))
        .and_then(|line| line.split_once(':'))
        .and_then(|(_, rest)| rest.trim().chars().next());

    let explanation = lines
        .iter()
        .find(|line| starts_with_ignore_case(line, "Explanation:"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, rest)| rest.trim().to_string());

    Mcq {
        question,
        options,
        correct,
        explanation,
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "\
Q1. What is the general formula of alkanes?
A. CnH2n
B. CnH2n+2
C. CnH2n-2
D. CnHn
Answer: B
Explanation: Alkanes are saturated hydrocarbons.

Q2. Which alkane has two carbon atoms?
A. Methane
B. Ethane
C. Propane
D. Butane
Answer: B
";

    #[test]
    fn parses_one_mcq_per_block_in_source_order() {
        let mcqs = parse_mcqs(TRANSCRIPT);
        assert_eq!(mcqs.len(), 2);
        assert_eq!(mcqs[0].question, "What is the general formula of alkanes?");
        assert_eq!(mcqs[1].question, "Which alkane has two carbon atoms?");
    }

    #[test]
    fn options_keep_the_full_line_and_expose_the_letter() {
        let mcqs = parse_mcqs(TRANSCRIPT);
        let options = &mcqs[0].options;
        assert_eq!(options.len(), 4);
        assert_eq!(options[1].letter, 'B');
        assert_eq!(options[1].text, "B. CnH2n+2");
        // El orden de las opciones es el del texto fuente.
        let letters: Vec<char> = options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn extracts_answer_letter_and_explanation() {
        let mcqs = parse_mcqs(TRANSCRIPT);
        assert_eq!(mcqs[0].correct, Some('B'));
        assert_eq!(
            mcqs[0].explanation.as_deref(),
            Some("Alkanes are saturated hydrocarbons.")
        );
        // El segundo bloque no trae explicación.
        assert_eq!(mcqs[1].correct, Some('B'));
        assert_eq!(mcqs[1].explanation, None);
    }

    #[test]
    fn answer_and_explanation_prefixes_are_case_insensitive() {
        let text = "Q1. ¿Capital de Francia?\nA. París\nB. Lyon\nanswer: A\nEXPLANATION: Es París.";
        let mcqs = parse_mcqs(text);
        assert_eq!(mcqs[0].correct, Some('A'));
        assert_eq!(mcqs[0].explanation.as_deref(), Some("Es París."));
    }

    #[test]
    fn empty_or_markerless_text_yields_no_mcqs() {
        assert!(parse_mcqs("").is_empty());
        assert!(parse_mcqs("La IA no está disponible ahora mismo.").is_empty());
        assert!(parse_mcqs("   \n\n  ").is_empty());
    }

    #[test]
    fn block_with_only_a_question_line_is_valid_but_unanswerable() {
        let mcqs = parse_mcqs("Q1. Define isomerism.");
        assert_eq!(mcqs.len(), 1);
        assert_eq!(mcqs[0].question, "Define isomerism.");
        assert!(mcqs[0].options.is_empty());
        assert_eq!(mcqs[0].correct, None);
        assert_eq!(mcqs[0].explanation, None);
        assert!(!mcqs[0].is_answerable());
    }

    #[test]
    fn missing_answer_line_leaves_correct_unset() {
        let mcqs = parse_mcqs("Q1. ¿Pregunta?\nA. Una\nB. Otra");
        assert_eq!(mcqs[0].correct, None);
        assert_eq!(mcqs[0].options.len(), 2);
    }

    #[test]
    fn empty_answer_line_does_not_produce_a_letter() {
        let mcqs = parse_mcqs("Q1. ¿Pregunta?\nA. Una\nAnswer:");
        assert_eq!(mcqs[0].correct, None);
    }

    #[test]
    fn reparsing_is_idempotent() {
        assert_eq!(parse_mcqs(TRANSCRIPT), parse_mcqs(TRANSCRIPT));
    }

    #[test]
    fn marker_requires_digits_and_period() {
        // "Q." sin dígitos no es marcador: sin ningún `Qn.` el texto
        // entero se descarta.
        assert!(parse_mcqs("Q. suelto sin número").is_empty());

        let mcqs = parse_mcqs("Q10. La décima pregunta\nA. Sí");
        assert_eq!(mcqs.len(), 1);
        assert_eq!(mcqs[0].question, "La décima pregunta");
    }

    #[test]
    fn text_before_the_first_marker_is_a_fragment_of_its_own() {
        // Solo se descartan los fragmentos vacíos; un preámbulo no vacío
        // cuenta como bloque (sin opciones, no interactivo).
        let mcqs = parse_mcqs("Here are your questions:\nQ1. ¿Pregunta?\nA. Una");
        assert_eq!(mcqs.len(), 2);
        assert_eq!(mcqs[0].question, "Here are your questions:");
        assert!(!mcqs[0].is_answerable());
        assert_eq!(mcqs[1].question, "¿Pregunta?");
    }
}
