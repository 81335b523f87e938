use crate::model::Mcq;
use std::collections::HashMap;

/// Resultado de registrar una selección.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// La pregunta ya tenía respuesta: la primera selección gana y las
    /// repeticiones no tocan ni el estado ni la puntuación.
    AlreadyAnswered,
    /// Índice fuera del rango de preguntas de la sesión.
    OutOfRange,
    Answered {
        correct: bool,
    },
    /// Con esta selección la sesión queda completa. Se emite exactamente
    /// una vez por sesión; una sesión abandonada no lo emite nunca.
    Completed {
        correct: bool,
        correct_count: u32,
        total: u32,
    },
}

/// Estado de selección de un quiz en curso. Se construye a partir de la
/// salida del parser y se descarta al pedir un quiz nuevo o cambiar de
/// tema; no hay crédito parcial.
pub struct AnswerSession {
    mcqs: Vec<Mcq>,
    selections: HashMap<usize, char>,
    correct_count: u32,
    completed: bool,
}

impl AnswerSession {
    pub fn new(mcqs: Vec<Mcq>) -> Self {
        Self {
            mcqs,
            selections: HashMap::new(),
            correct_count: 0,
            completed: false,
        }
    }

    /// Registra la selección de `letter` para la pregunta `index`.
    ///
    /// Garantiza como mucho un intento puntuado por pregunta, dispare la
    /// UI los eventos que dispare. Una pregunta sin `correct` nunca
    /// puntúa: cualquier selección cuenta como incorrecta.
    pub fn select(&mut self, index: usize, letter: char) -> SelectionOutcome {
        if index >= self.mcqs.len() {
            return SelectionOutcome::OutOfRange;
        }
        if self.selections.contains_key(&index) {
            return SelectionOutcome::AlreadyAnswered;
        }

        let correct = self.mcqs[index].correct == Some(letter);
        self.selections.insert(index, letter);
        if correct {
            self.correct_count += 1;
        }

        if !self.completed && self.selections.len() == self.mcqs.len() {
            self.completed = true;
            return SelectionOutcome::Completed {
                correct,
                correct_count: self.correct_count,
                total: self.mcqs.len() as u32,
            };
        }

        SelectionOutcome::Answered { correct }
    }

    pub fn mcqs(&self) -> &[Mcq] {
        &self.mcqs
    }

    pub fn total(&self) -> usize {
        self.mcqs.len()
    }

    /// Letra seleccionada para una pregunta, si ya se respondió.
    pub fn selected(&self, index: usize) -> Option<char> {
        self.selections.get(&index).copied()
    }

    pub fn selections(&self) -> &HashMap<usize, char> {
        &self.selections
    }

    /// Cuenta corrida de aciertos.
    pub fn score(&self) -> u32 {
        self.correct_count
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}
