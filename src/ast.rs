//! A small pretty-printer used mostly for debug logging (`trace!` output
//! from the parser) and tests that want to assert on AST shape without
//! reaching into every field by hand.

use crate::expr::Expr;
use crate::stmt::Stmt;

pub fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Integer(d) => d.value.to_string(),
        Expr::Float(d) => d.value.to_string(),
        Expr::Str(d) => format!("{:?}", d.value),
        Expr::Boolean(d) => d.value.to_string(),
        Expr::Null(_) => "null".to_string(),
        Expr::Identifier(d) => d.name.clone(),
        Expr::Array(d) => {
            let items: Vec<String> = d.elements.iter().map(format_expr).collect();
            format!("[{}]", items.join(", "))
        }
        Expr::Hash(d) => {
            let items: Vec<String> = d.pairs.iter()
                .map(|(k, v)| format!("{}: {}", format_expr(k), format_expr(v)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
        Expr::Function(d) => {
            let params: Vec<String> = d.params.iter().map(|p| p.lexeme.clone()).collect();
            format!("fn({}) {{ ... }}", params.join(", "))
        }
        Expr::Prefix(d) => format!("({}{})", d.operator.lexeme, format_expr(&d.right)),
        Expr::Infix(d) => format!("({} {} {})", format_expr(&d.left), d.operator.lexeme, format_expr(&d.right)),
        Expr::If(d) => {
            let mut s = String::from("(if ");
            for (i, branch) in d.branches.iter().enumerate() {
                if i > 0 {
                    s.push_str(" elif ");
                }
                s.push_str(&format_expr(&branch.condition));
            }
            s.push(')');
            s
        }
        Expr::Call(d) => {
            let args: Vec<String> = d.args.iter().map(format_expr).collect();
            format!("{}({})", format_expr(&d.callee), args.join(", "))
        }
        Expr::Index(d) => format!("{}[{}]", format_expr(&d.object), format_expr(&d.index)),
        Expr::Property(d) => format!("{}.{}", format_expr(&d.object), d.name.lexeme),
        Expr::Assignment(d) => format!("({} = {})", format_expr(&d.target), format_expr(&d.value)),
        Expr::New(d) => {
            let args: Vec<String> = d.args.iter().map(format_expr).collect();
            format!("new {}({})", d.class_name.lexeme, args.join(", "))
        }
        Expr::This(_) => "this".to_string(),
        Expr::Super(d) => match &d.method {
            Some(m) => format!("super.{}", m.lexeme),
            None => "super".to_string(),
        },
    }
}

pub fn format_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Let(d) => format!("let {} = {};", d.name.lexeme, format_expr(&d.value)),
        Stmt::Const(d) => format!("const {} = {};", d.name.lexeme, format_expr(&d.value)),
        Stmt::Return(d) => match &d.value {
            Some(expr) => format!("return {};", format_expr(expr)),
            None => "return;".to_string(),
        },
        Stmt::While(d) => format!("while ({}) {{ ... }}", format_expr(&d.condition)),
        Stmt::For(d) => format!("for (...; {}; {}) {{ ... }}", format_expr(&d.condition), format_expr(&d.update)),
        Stmt::Break(_) => "break;".to_string(),
        Stmt::Continue(_) => "continue;".to_string(),
        Stmt::Block(d) => {
            let body: Vec<String> = d.statements.iter().map(format_stmt).collect();
            format!("{{ {} }}", body.join(" "))
        }
        Stmt::Expression(d) => format!("{};", format_expr(&d.expr)),
        Stmt::Class(d) => format!("class {} {{ ... }}", d.name.lexeme),
    }
}
